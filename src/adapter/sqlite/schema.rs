//! Diesel table definitions; mirrors migrations/.

diesel::table! {
    users (id) {
        id -> BigInt,
        username -> Text,
        first_name -> Text,
        active -> Bool,
    }
}

diesel::table! {
    categories (id) {
        id -> Integer,
        name -> Text,
        brand_id -> Nullable<Text>,
    }
}

diesel::table! {
    subscriptions (user_id, category_id) {
        user_id -> BigInt,
        category_id -> Integer,
    }
}

diesel::table! {
    listings (unique_id) {
        unique_id -> BigInt,
        title -> Text,
        price -> Double,
        brand_name -> Text,
        size -> Text,
        url -> Text,
        image_path -> Nullable<Text>,
        category_id -> Integer,
        discovered_at -> Text,
    }
}

diesel::table! {
    deliveries (user_id, listing_id) {
        user_id -> BigInt,
        listing_id -> BigInt,
    }
}

diesel::joinable!(subscriptions -> users (user_id));
diesel::joinable!(subscriptions -> categories (category_id));
diesel::joinable!(listings -> categories (category_id));
diesel::joinable!(deliveries -> users (user_id));
diesel::joinable!(deliveries -> listings (listing_id));

diesel::allow_tables_to_appear_in_same_query!(users, categories, subscriptions, listings, deliveries);
