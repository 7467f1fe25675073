//! Diesel table definitions. Kept in sync with the embedded migrations.

diesel::table! {
    products (code) {
        code -> Text,
        name -> Text,
        unit_type -> Text,
        regular_price -> Text,
        club_price -> Nullable<Text>,
        created_at -> Text,
        updated_at -> Text,
        deleted_at -> Nullable<Text>,
    }
}

diesel::table! {
    reasons (id) {
        id -> Text,
        code -> Text,
        description -> Text,
        is_active -> Integer,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    entries (id) {
        id -> BigInt,
        product_code -> Text,
        product_name -> Text,
        reason_id -> Text,
        quantity -> Text,
        unit_cost -> Text,
        notes -> Nullable<Text>,
        is_synchronized -> Integer,
        created_at -> Text,
    }
}

diesel::table! {
    import_runs (id) {
        id -> Text,
        file_name -> Text,
        total_lines -> BigInt,
        imported_lines -> BigInt,
        failed_lines -> BigInt,
        status -> Text,
        error_log -> Nullable<Text>,
        created_at -> Text,
    }
}

diesel::joinable!(entries -> reasons (reason_id));

diesel::allow_tables_to_appear_in_same_query!(entries, import_runs, products, reasons);
