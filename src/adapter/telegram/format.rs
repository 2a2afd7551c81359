//! Message formatting for the Telegram channel.

use crate::domain::RenderedListing;

/// Render a listing as a Telegram HTML message body.
///
/// Used both as a photo caption and as a plain message when no image was
/// captured for the listing.
#[must_use]
pub fn format_listing(listing: &RenderedListing) -> String {
    format!(
        "<b>{}</b>\nBrand: {}\nSize: {}\nPrice: {}Zł\n{}",
        escape_html(&listing.title),
        escape_html(&listing.brand_name),
        escape_html(&listing.size),
        listing.price,
        listing.url,
    )
}

/// Escape text for Telegram HTML parse mode.
///
/// Titles and brand names are upstream-controlled and may contain markup
/// characters.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn listing() -> RenderedListing {
        RenderedListing {
            title: "Nike jacket".into(),
            brand_name: "Nike".into(),
            size: "M".into(),
            price: dec!(50),
            url: "https://www.vinted.pl/items/101".into(),
            image_path: None,
        }
    }

    #[test]
    fn message_layout() {
        let text = format_listing(&listing());
        assert_eq!(
            text,
            "<b>Nike jacket</b>\nBrand: Nike\nSize: M\nPrice: 50Zł\nhttps://www.vinted.pl/items/101"
        );
    }

    #[test]
    fn markup_in_title_is_escaped() {
        let mut l = listing();
        l.title = "Tom & Jerry <vintage>".into();
        let text = format_listing(&l);
        assert!(text.starts_with("<b>Tom &amp; Jerry &lt;vintage&gt;</b>"));
    }

    #[test]
    fn fractional_price_renders_as_entered() {
        let mut l = listing();
        l.price = dec!(19.99);
        assert!(format_listing(&l).contains("Price: 19.99Zł"));
    }
}
