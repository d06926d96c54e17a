//! Diesel table definitions mirroring `backend/migrations`.
//!
//! Keep in sync with the migrations by hand or regenerate with
//! `diesel print-schema` against a migrated database.

diesel::table! {
    /// Registered accounts. `email` is unique and stored lower-cased.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        phone -> Varchar,
        avatar -> Nullable<Text>,
        /// PHC-formatted Argon2 hash.
        password_hash -> Text,
        is_host -> Bool,
        payment_account_id -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Listings. Deleted with their host.
    properties (id) {
        id -> Uuid,
        host_id -> Uuid,
        property_type -> Varchar,
        name -> Text,
        state -> Text,
        city -> Text,
        address -> Text,
        gps_url -> Nullable<Text>,
        opening_time -> Nullable<Varchar>,
        closing_time -> Nullable<Varchar>,
        price_per_day -> Nullable<Numeric>,
        rental_type -> Nullable<Varchar>,
        monthly_price -> Nullable<Numeric>,
        lease_price -> Nullable<Numeric>,
        advance_amount -> Nullable<Numeric>,
        lease_time_limit -> Nullable<Int4>,
        max_guests -> Nullable<Int4>,
        bedrooms -> Nullable<Int4>,
        facilities -> Array<Text>,
        images -> Array<Text>,
        available -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Reservations. Either both dates or a duration are set.
    bookings (id) {
        id -> Uuid,
        guest_id -> Uuid,
        property_id -> Uuid,
        check_in -> Nullable<Timestamptz>,
        check_out -> Nullable<Timestamptz>,
        duration -> Nullable<Int4>,
        duration_unit -> Nullable<Varchar>,
        guests -> Int4,
        total_price -> Numeric,
        payment_status -> Varchar,
        payment_method -> Varchar,
        order_id -> Nullable<Varchar>,
        payment_id -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(properties -> users (host_id));
diesel::joinable!(bookings -> properties (property_id));

diesel::allow_tables_to_appear_in_same_query!(users, properties, bookings);
