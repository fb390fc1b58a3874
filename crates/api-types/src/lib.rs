//! JSON bodies exchanged between game clients and the server.
//!
//! Coordinates are `{lat, lng}` degrees, distances are meters and timestamps
//! are epoch seconds.

use serde::{Deserialize, Serialize};

/// A stored target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetResponse {
    pub key: u64,
    pub lat: f64,
    pub lng: f64,
}

/// Answer to "find a target near me".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolvedTargetResponse {
    pub key: u64,
    pub lat: f64,
    pub lng: f64,
    /// `true` when the target was generated for this request
    pub created: bool,
    /// Meters from the requesting coordinate
    pub distance: f64,
    /// Initial bearing from the requesting coordinate, degrees clockwise from north
    pub bearing: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub timestamp: f64,
    pub picture_url: Option<String>,
    pub final_distance: f64,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub text: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub picture_id: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUploadResponse {
    pub picture_id: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub data: Vec<T>,
    pub page_number: usize,
    pub last_page: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_uses_camel_case() {
        let page = PageResponse {
            data: vec![PostResponse {
                timestamp: 1.5,
                picture_url: None,
                final_distance: 12.0,
                text: "hi".into(),
            }],
            page_number: 1,
            last_page: true,
        };

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["pageNumber"], 1);
        assert_eq!(json["lastPage"], true);
        assert_eq!(json["data"][0]["finalDistance"], 12.0);
        assert!(json["data"][0]["pictureUrl"].is_null());
    }

    #[test]
    fn test_create_post_picture_is_optional() {
        let req: CreatePostRequest =
            serde_json::from_str(r#"{"text": "t", "lat": 1.0, "lng": 2.0}"#).unwrap();
        assert_eq!(req.picture_id, None);

        let req: CreatePostRequest =
            serde_json::from_str(r#"{"text": "t", "lat": 1.0, "lng": 2.0, "pictureId": 3}"#)
                .unwrap();
        assert_eq!(req.picture_id, Some(3));
    }
}
