/*
 * Responsibility
 * - travel の request/response DTO
 * - travel は places を埋め込んだ形で返す
 */
use serde::{Deserialize, Serialize};

use crate::api::common::dto::present;
use crate::repos::travel_repo::{NewPlace, PlaceRow, TravelFields, TravelRow};

#[derive(Debug, Serialize)]
pub struct TravelView {
    #[serde(flatten)]
    pub travel: TravelRow,
    pub places: Vec<PlaceRow>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TravelRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub cost: Option<f64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub transportation_rating: Option<i64>,
    pub safety_rating: Option<i64>,
    pub population_rating: Option<i64>,
    pub nature_rating: Option<i64>,
    pub places: Option<Vec<PlaceRequest>>,
}

impl TravelRequest {
    /// Create needs a title and a location, checked in that order.
    pub fn validate_new(&self) -> Result<(), &'static str> {
        if present(&self.title).is_none() {
            return Err("Field 'title' is required");
        }
        if present(&self.location).is_none() {
            return Err("Field 'location' is required");
        }
        Ok(())
    }

    /// Travel columns only; `places` stays behind for the caller.
    pub fn take_fields(&mut self) -> TravelFields {
        TravelFields {
            title: self.title.take().filter(|t| !t.trim().is_empty()),
            description: self.description.take(),
            location: self.location.take().filter(|l| !l.trim().is_empty()),
            latitude: self.latitude,
            longitude: self.longitude,
            cost: self.cost,
            start_date: self.start_date.take(),
            end_date: self.end_date.take(),
            transportation_rating: self.transportation_rating,
            safety_rating: self.safety_rating,
            population_rating: self.population_rating,
            nature_rating: self.nature_rating,
        }
    }
}

/// One entry of a travel's `places` list, or the body of an add-place call.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PlaceRequest {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub visited: Option<bool>,
    #[serde(rename = "isRemoved")]
    pub is_removed: Option<bool>,
}

impl PlaceRequest {
    pub fn is_removed(&self) -> bool {
        self.is_removed == Some(true)
    }

    /// `None` for nameless entries, which are skipped.
    pub fn to_new_place(&self) -> Option<NewPlace> {
        let name = present(&self.name)?;
        Some(NewPlace {
            name: name.to_string(),
            description: self.description.clone().unwrap_or_default(),
            latitude: self.latitude,
            longitude: self.longitude,
            visited: self.visited.unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_checked_before_location() {
        let req = TravelRequest::default();
        assert_eq!(req.validate_new(), Err("Field 'title' is required"));

        let req = TravelRequest {
            title: Some("Trip".into()),
            location: Some(" ".into()),
            ..Default::default()
        };
        assert_eq!(req.validate_new(), Err("Field 'location' is required"));
    }

    #[test]
    fn nameless_places_are_skipped() {
        let places: Vec<PlaceRequest> =
            serde_json::from_str(r#"[{"name":"Louvre","visited":true},{"description":"x"},{"id":3,"isRemoved":true}]"#)
                .unwrap();

        assert!(places[0].to_new_place().is_some_and(|p| p.visited));
        assert!(places[1].to_new_place().is_none());
        assert!(places[2].is_removed());
    }
}
