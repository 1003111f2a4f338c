/*
 * Responsibility
 * - travels / places_to_visit テーブル向け操作 (travel)
 * - location の部分一致 (大文字小文字を区別しない) と並び替え
 */
use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::repos::Db;

#[derive(Debug, Clone, Serialize)]
pub struct TravelRow {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub cost: Option<f64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub transportation_rating: Option<i64>,
    pub safety_rating: Option<i64>,
    pub population_rating: Option<i64>,
    pub nature_rating: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlaceRow {
    pub id: i64,
    pub travel_id: i64,
    pub name: String,
    pub description: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub visited: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelSortKey {
    Title,
    Location,
    Cost,
    StartDate,
    CreatedAt,
}

impl TravelSortKey {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "title" => Some(Self::Title),
            "location" => Some(Self::Location),
            "cost" => Some(Self::Cost),
            "start_date" => Some(Self::StartDate),
            "created_at" => Some(Self::CreatedAt),
            _ => None,
        }
    }

    fn compare(&self, a: &TravelRow, b: &TravelRow) -> Ordering {
        match self {
            Self::Title => a.title.cmp(&b.title),
            Self::Location => a.location.cmp(&b.location),
            Self::Cost => a.cost.unwrap_or(0.0).total_cmp(&b.cost.unwrap_or(0.0)),
            Self::StartDate => a.start_date.cmp(&b.start_date),
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
        }
    }
}

/// Sort order for listings. Without a valid key, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TravelSort {
    pub key: Option<TravelSortKey>,
    pub descending: bool,
}

impl TravelSort {
    /// `sort_direction` defaults to ascending and ignores unknown values.
    pub fn parse(sort_by: Option<&str>, direction: Option<&str>) -> Self {
        let key = sort_by.and_then(TravelSortKey::parse);
        let descending = direction.is_some_and(|d| d.eq_ignore_ascii_case("desc"));
        Self { key, descending }
    }

    fn compare(&self, a: &TravelRow, b: &TravelRow) -> Ordering {
        match self.key {
            Some(key) => {
                let ord = key.compare(a, b).then(a.id.cmp(&b.id));
                if self.descending { ord.reverse() } else { ord }
            }
            None => b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)),
        }
    }
}

#[derive(Debug, Default)]
pub struct TravelQuery<'a> {
    pub user_id: Option<i64>,
    pub location: Option<&'a str>,
    pub sort: TravelSort,
}

#[derive(Debug, Default, Clone)]
pub struct TravelFields {
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
}

#[derive(Debug, Clone)]
pub struct NewPlace {
    pub name: String,
    pub description: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub visited: bool,
}

pub fn list(db: &Db, query: &TravelQuery<'_>) -> Vec<TravelRow> {
    let needle = query.location.map(str::to_lowercase).filter(|l| !l.is_empty());

    let mut travels = db.travels.filter(|t| {
        query.user_id.is_none_or(|uid| t.user_id == uid)
            && needle
                .as_deref()
                .is_none_or(|n| t.location.to_lowercase().contains(n))
    });
    travels.sort_by(|a, b| query.sort.compare(a, b));
    travels
}

pub fn get(db: &Db, id: i64) -> Option<TravelRow> {
    db.travels.get(id)
}

/// `title` and `location` must be present in `fields`; callers check that first.
pub fn create(db: &Db, user_id: i64, fields: TravelFields) -> TravelRow {
    let now = Utc::now();
    db.travels.insert_with(|id| TravelRow {
        id,
        user_id,
        title: fields.title.unwrap_or_default(),
        description: fields.description.unwrap_or_default(),
        location: fields.location.unwrap_or_default(),
        latitude: fields.latitude,
        longitude: fields.longitude,
        cost: fields.cost,
        start_date: fields.start_date,
        end_date: fields.end_date,
        transportation_rating: fields.transportation_rating,
        safety_rating: fields.safety_rating,
        population_rating: fields.population_rating,
        nature_rating: fields.nature_rating,
        created_at: now,
        updated_at: now,
    })
}

/// Overwrites the fields that are `Some`.
pub fn update(db: &Db, id: i64, fields: TravelFields) -> Option<TravelRow> {
    db.travels.update(id, |travel| {
        if let Some(v) = fields.title {
            travel.title = v;
        }
        if let Some(v) = fields.description {
            travel.description = v;
        }
        if let Some(v) = fields.location {
            travel.location = v;
        }
        if fields.latitude.is_some() {
            travel.latitude = fields.latitude;
        }
        if fields.longitude.is_some() {
            travel.longitude = fields.longitude;
        }
        if fields.cost.is_some() {
            travel.cost = fields.cost;
        }
        if fields.start_date.is_some() {
            travel.start_date = fields.start_date;
        }
        if fields.end_date.is_some() {
            travel.end_date = fields.end_date;
        }
        if fields.transportation_rating.is_some() {
            travel.transportation_rating = fields.transportation_rating;
        }
        if fields.safety_rating.is_some() {
            travel.safety_rating = fields.safety_rating;
        }
        if fields.population_rating.is_some() {
            travel.population_rating = fields.population_rating;
        }
        if fields.nature_rating.is_some() {
            travel.nature_rating = fields.nature_rating;
        }
        travel.updated_at = Utc::now();
        travel.clone()
    })
}

/// Deletes the travel and its places.
pub fn delete(db: &Db, id: i64) -> bool {
    if db.travels.delete(id).is_none() {
        return false;
    }
    db.places.delete_where(|p| p.travel_id == id);
    true
}

/// Places in the order they were added.
pub fn places_of(db: &Db, travel_id: i64) -> Vec<PlaceRow> {
    let mut places = db.places.filter(|p| p.travel_id == travel_id);
    places.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    places
}

pub fn add_place(db: &Db, travel_id: i64, place: NewPlace) -> PlaceRow {
    db.places.insert_with(|id| PlaceRow {
        id,
        travel_id,
        name: place.name,
        description: place.description,
        latitude: place.latitude,
        longitude: place.longitude,
        visited: place.visited,
        created_at: Utc::now(),
    })
}

/// Rewrites a place of `travel_id`. Places of other travels are left alone.
pub fn replace_place(db: &Db, travel_id: i64, place_id: i64, place: NewPlace) -> Option<PlaceRow> {
    db.places
        .update(place_id, |row| {
            if row.travel_id != travel_id {
                return None;
            }
            row.name = place.name;
            row.description = place.description;
            row.latitude = place.latitude;
            row.longitude = place.longitude;
            row.visited = place.visited;
            Some(row.clone())
        })
        .flatten()
}

/// Removes a place of `travel_id`. Returns whether anything was removed.
pub fn remove_place(db: &Db, travel_id: i64, place_id: i64) -> bool {
    db.places
        .delete_where(|p| p.id == place_id && p.travel_id == travel_id)
        > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn travel(db: &Db, user_id: i64, title: &str, location: &str, cost: f64) -> TravelRow {
        create(
            db,
            user_id,
            TravelFields {
                title: Some(title.into()),
                location: Some(location.into()),
                cost: Some(cost),
                ..Default::default()
            },
        )
    }

    fn place(name: &str) -> NewPlace {
        NewPlace {
            name: name.into(),
            description: String::new(),
            latitude: None,
            longitude: None,
            visited: false,
        }
    }

    #[test]
    fn location_filter_is_case_insensitive_substring() {
        let db = Db::new();
        travel(&db, 1, "a", "Санкт-Петербург", 1.0);
        travel(&db, 1, "b", "Paris", 1.0);

        let q = TravelQuery {
            location: Some("петер"),
            ..Default::default()
        };
        assert_eq!(list(&db, &q).len(), 1);

        let q = TravelQuery {
            location: Some("PAR"),
            ..Default::default()
        };
        assert_eq!(list(&db, &q)[0].title, "b");
    }

    #[test]
    fn sorting_by_key_and_direction() {
        let db = Db::new();
        travel(&db, 1, "cheap", "x", 10.0);
        travel(&db, 2, "pricey", "x", 99.0);

        let titles = |sort: TravelSort| -> Vec<String> {
            let q = TravelQuery { sort, ..Default::default() };
            list(&db, &q).into_iter().map(|t| t.title).collect()
        };

        assert_eq!(titles(TravelSort::parse(Some("cost"), None)), ["cheap", "pricey"]);
        assert_eq!(titles(TravelSort::parse(Some("cost"), Some("DESC"))), ["pricey", "cheap"]);
        // Unknown key: newest first.
        assert_eq!(titles(TravelSort::parse(Some("rating"), None)), ["pricey", "cheap"]);
    }

    #[test]
    fn places_cannot_be_touched_through_another_travel() {
        let db = Db::new();
        let mine = travel(&db, 1, "a", "x", 0.0);
        let other = travel(&db, 2, "b", "y", 0.0);
        let p = add_place(&db, other.id, place("museum"));

        assert!(replace_place(&db, mine.id, p.id, place("hijacked")).is_none());
        assert!(!remove_place(&db, mine.id, p.id));
        assert_eq!(places_of(&db, other.id)[0].name, "museum");

        assert!(delete(&db, other.id));
        assert!(db.places.is_empty());
    }
}
