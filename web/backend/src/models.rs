use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Deserialize)]
pub struct SetBinRequest {
    pub bin: String,
}

#[derive(Serialize, Deserialize)]
pub struct BinResponse {
    pub id: String,
    pub bin: String,
}
