//! Wire payload validation and conversion
//!
//! The admin form submits tags as one comma-separated string and the
//! minimum length as text; everything is checked and normalized here so
//! the repository only ever sees well-formed [`PoiData`].

use shared::models::{Coordinate, PoiData, PoiInput};

use crate::utils::AppResult;
use crate::utils::error::AppError;
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_IMAGE_LEN, MAX_NAME_LEN, MAX_TAG_LEN, MAX_TAGS_LEN, parse_non_negative,
    validate_hhmm, validate_required_text,
};

/// Validate a create/edit request body and convert it into the
/// repository payload.
pub fn poi_input_to_data(input: PoiInput) -> AppResult<PoiData> {
    validate_required_text(&input.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&input.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_required_text(&input.image, "image", MAX_IMAGE_LEN)?;
    validate_required_text(&input.tags, "tags", MAX_TAGS_LEN)?;
    validate_hhmm(&input.poi_opens_doors_at, "poiOpensDoorsAt")?;
    validate_hhmm(&input.poi_closes_doors_at, "poiClosesDoorsAt")?;
    let required_min_length = parse_non_negative(&input.required_min_length, "requiredMinLength")?;
    validate_rings(&input.coordinates)?;

    let tags: Vec<String> = input
        .tags
        .split(',')
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect();
    for tag in &tags {
        if tag.len() > MAX_TAG_LEN {
            return Err(AppError::validation(format!(
                "tag '{tag}' is too long (max {MAX_TAG_LEN} chars)"
            )));
        }
    }

    Ok(PoiData {
        name: input.name,
        category: input.category,
        image: input.image,
        description: input.description,
        tags,
        target_group: input.target_group,
        required_min_length,
        poi_opens_doors_at: input.poi_opens_doors_at,
        poi_closes_doors_at: input.poi_closes_doors_at,
        coordinates: input.coordinates,
        related_poi_ids: input.related_to_attraction_ids,
    })
}

/// A POI needs at least one ring; a single point marks a map marker,
/// three or more points describe a zone boundary. Two points describe
/// neither.
fn validate_rings(rings: &[Vec<Coordinate>]) -> AppResult<()> {
    if rings.is_empty() {
        return Err(AppError::validation(
            "coordinates must contain at least one ring",
        ));
    }
    for ring in rings {
        match ring.len() {
            0 => {
                return Err(AppError::validation(
                    "coordinate rings must not be empty",
                ));
            }
            2 => {
                return Err(AppError::validation(
                    "a coordinate ring needs one point (marker) or at least three (zone boundary)",
                ));
            }
            _ => {}
        }
    }
    Ok(())
}
