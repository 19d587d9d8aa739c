use serde::{Deserialize, Serialize};

pub mod get_service_health {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    pub struct APIResponse {
        pub status: String,
        pub service: String,
    }
}
