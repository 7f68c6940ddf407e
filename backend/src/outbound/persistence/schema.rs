//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered remote deployments.
    deployments (id) {
        id -> Uuid,
        /// Owning user; every query filters on it.
        owner_id -> Uuid,
        name -> Text,
        url -> Text,
        deploy_key -> Text,
        /// One of `dev`, `staging`, `prod`.
        environment -> Text,
        /// One of `connected`, `error`, `pending`.
        status -> Text,
        last_checked -> Nullable<Timestamptz>,
        error_message -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Per-deployment log stream.
    logs (id) {
        id -> Uuid,
        deployment_id -> Uuid,
        owner_id -> Uuid,
        /// One of `error`, `warning`, `info`, `debug`.
        level -> Text,
        message -> Text,
        function_name -> Nullable<Text>,
        request_id -> Nullable<Text>,
        timestamp -> Timestamptz,
    }
}

diesel::table! {
    /// Last fetched or manually entered schema, one row per deployment.
    cached_schemas (deployment_id) {
        deployment_id -> Uuid,
        owner_id -> Uuid,
        raw_schema -> Text,
        fetched_at -> Timestamptz,
    }
}

diesel::joinable!(logs -> deployments (deployment_id));
diesel::joinable!(cached_schemas -> deployments (deployment_id));

diesel::allow_tables_to_appear_in_same_query!(deployments, logs, cached_schemas);
