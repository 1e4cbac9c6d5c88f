//! Image info integration tests.
//!
//! Tests verify:
//! - Complete info.json documents for known images
//! - Profiles advertised per compliance level
//! - Service embedding (single object vs. array)
//! - Invalid documents are rejected

use serde_json::{json, Value};

use iiif_tiler::config::{info_id, profile_for_level};
use iiif_tiler::info::{
    ComplianceLevel, ImageInfo, PhysicalDimService, Profile, TileSet, CONTEXT_URI,
    PHYSICAL_DIM_CONTEXT, PHYSICAL_DIM_PROFILE, PROTOCOL_URI,
};
use iiif_tiler::InfoError;

fn parse(info: &ImageInfo) -> Value {
    serde_json::from_str(&info.to_json().unwrap()).unwrap()
}

// =============================================================================
// Complete Documents
// =============================================================================

#[test]
fn test_level0_document() {
    let info = ImageInfo::for_image(
        info_id(Some("https://example.org/"), "iiif", "scan 01"),
        2000,
        1000,
        500,
        profile_for_level(0),
    )
    .unwrap();

    assert_eq!(
        parse(&info),
        json!({
            "@context": CONTEXT_URI,
            "@id": "https://example.org/iiif/scan%2001",
            "@type": "iiif:Image",
            "protocol": PROTOCOL_URI,
            "width": 2000,
            "height": 1000,
            "sizes": [
                {"width": 1000, "height": 500},
                {"width": 2000, "height": 1000}
            ],
            "tiles": [
                {"width": 500, "scaleFactors": [1, 2]}
            ],
            "profile": [
                "http://iiif.io/api/image/2/level0.json",
                {"formats": ["jpg"], "qualities": ["default"]}
            ]
        })
    );
}

#[test]
fn test_field_order() {
    let info = ImageInfo::for_image("/iiif/x", 100, 100, 256, profile_for_level(0)).unwrap();
    let json = info.to_json().unwrap();

    let keys = ["\"@context\"", "\"@id\"", "\"@type\"", "\"protocol\"", "\"width\"", "\"height\"", "\"profile\""];
    let positions: Vec<usize> = keys.iter().map(|key| json.find(key).unwrap()).collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]), "{}", json);
}

#[test]
fn test_level2_profile_advertises_features() {
    let info = ImageInfo::for_image("/iiif/x", 640, 480, 256, profile_for_level(2)).unwrap();
    let json = parse(&info);

    assert_eq!(json["profile"][0], "http://iiif.io/api/image/2/level2.json");
    assert_eq!(
        json["profile"][1]["qualities"],
        json!(["default", "color", "gray", "bitonal"])
    );
    let supports = json["profile"][1]["supports"].as_array().unwrap();
    assert!(supports.contains(&json!("mirroring")));
    assert!(supports.contains(&json!("rotationArbitrary")));
}

#[test]
fn test_rectangular_tiles() {
    let info = ImageInfo::new("/iiif/x")
        .with_dimensions(1024, 512)
        .with_profile(Profile::new(ComplianceLevel::One))
        .add_tiles(TileSet::new(512, 256, vec![1, 2, 4]));

    let json = parse(&info);
    assert_eq!(
        json["tiles"],
        json!([{"width": 512, "height": 256, "scaleFactors": [1, 2, 4]}])
    );
    assert!(json.get("sizes").is_none());
}

// =============================================================================
// Services
// =============================================================================

#[test]
fn test_single_service_is_object() {
    let info = ImageInfo::for_image("/iiif/x", 800, 600, 256, profile_for_level(1))
        .unwrap()
        .add_service(PhysicalDimService::new(0.0025, "in"));

    assert_eq!(
        parse(&info)["service"],
        json!({
            "@context": PHYSICAL_DIM_CONTEXT,
            "profile": PHYSICAL_DIM_PROFILE,
            "physicalScale": 0.0025,
            "physicalUnits": "in"
        })
    );
}

#[test]
fn test_multiple_services_are_array() {
    let info = ImageInfo::for_image("/iiif/x", 800, 600, 256, profile_for_level(1))
        .unwrap()
        .add_service(PhysicalDimService::new(0.0025, "in"))
        .add_service(PhysicalDimService::new(0.0635, "mm"));

    let json = parse(&info);
    let services = json["service"].as_array().unwrap();
    assert_eq!(services.len(), 2);
    assert_eq!(services[1]["physicalUnits"], "mm");
}

// =============================================================================
// Invalid Documents
// =============================================================================

#[test]
fn test_invalid_documents() {
    assert!(matches!(
        ImageInfo::for_image("/iiif/x", 0, 600, 256, profile_for_level(0)),
        Err(InfoError::InvalidInfo { .. })
    ));
    assert!(matches!(
        ImageInfo::for_image("/iiif/x", 800, 600, 0, profile_for_level(0)),
        Err(InfoError::InvalidInfo { .. })
    ));

    let err = ImageInfo::new("/iiif/x").with_dimensions(10, 10).to_json().unwrap_err();
    assert!(err.to_string().contains("profile"));
}
