//! Diesel table definitions.
//!
//! Identifiers are opaque text, not UUID columns, so rows seeded with
//! human-readable ids coexist with generated ones.

diesel::table! {
    users (id) {
        id -> Text,
        name -> Text,
        email -> Text,
        password -> Nullable<Text>,
        image -> Nullable<Text>,
    }
}

diesel::table! {
    customers (id) {
        id -> Text,
        owner_id -> Text,
        name -> Text,
        email -> Text,
        image_url -> Nullable<Text>,
    }
}

diesel::table! {
    invoices (id) {
        id -> Text,
        owner_id -> Text,
        customer_id -> Text,
        amount -> Int8,
        status -> Text,
        date -> Date,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, customers, invoices);
