use actix_cors::Cors;

/// The web board and the phone app talk to the API from arbitrary origins on
/// the local network.
pub fn create_cors() -> Cors {
    Cors::default()
        .allowed_origin_fn(|_, _req_head| true)
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allow_any_header()
        .supports_credentials()
        .max_age(3600)
}
