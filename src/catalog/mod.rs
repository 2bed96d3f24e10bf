//! The catalog query pipeline: brand filter, free-text search and sort over
//! the fetched car-model set. Pure and deterministic; the fetched set is
//! never mutated (sorting works on a copy) and applying the same query twice
//! yields the same sequence.

use serde::Deserialize;
use url::form_urlencoded;
use uuid::Uuid;

use crate::models::CarListing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrandFilter {
    All,
    Brand(Uuid),
}

impl BrandFilter {
    fn from_param(param: Option<&str>) -> Self {
        match param.and_then(|s| Uuid::parse_str(s).ok()) {
            Some(id) => BrandFilter::Brand(id),
            None => BrandFilter::All,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Fetched order: the backing read is pre-sorted by creation time
    /// descending, so "newest" applies no re-sort.
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    Name,
    Year,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::PriceAsc => "price-asc",
            SortKey::PriceDesc => "price-desc",
            SortKey::Name => "name",
            SortKey::Year => "year",
        }
    }

    fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("price-asc") => SortKey::PriceAsc,
            Some("price-desc") => SortKey::PriceDesc,
            Some("name") => SortKey::Name,
            Some("year") => SortKey::Year,
            _ => SortKey::Newest,
        }
    }
}

/// Raw query parameters as they arrive on the catalog route.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogParams {
    pub brand: Option<String>,
    pub q: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub brand: BrandFilter,
    pub search: String,
    pub sort: SortKey,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            brand: BrandFilter::All,
            search: String::new(),
            sort: SortKey::Newest,
        }
    }
}

impl CatalogQuery {
    pub fn from_params(params: &CatalogParams) -> Self {
        Self {
            brand: BrandFilter::from_param(params.brand.as_deref()),
            search: params.q.clone().unwrap_or_default().trim().to_string(),
            sort: SortKey::from_param(params.sort.as_deref()),
        }
    }

    /// Reconstructs a query from a raw query string (without the `?`).
    pub fn from_query_string(query: &str) -> Self {
        let mut params = CatalogParams::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "brand" => params.brand = Some(value.into_owned()),
                "q" => params.q = Some(value.into_owned()),
                "sort" => params.sort = Some(value.into_owned()),
                _ => {}
            }
        }
        Self::from_params(&params)
    }

    /// Canonical query string for this query. The brand parameter is written
    /// only for a concrete brand ("all" removes it entirely); search and sort
    /// are likewise omitted at their defaults. An all-default query
    /// serializes to the empty string.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if let BrandFilter::Brand(id) = self.brand {
            serializer.append_pair("brand", &id.to_string());
        }
        if !self.search.is_empty() {
            serializer.append_pair("q", &self.search);
        }
        if self.sort != SortKey::Newest {
            serializer.append_pair("sort", self.sort.as_str());
        }
        serializer.finish()
    }

    /// Runs the pipeline: brand filter, then search, then sort.
    pub fn apply(&self, cars: &[CarListing]) -> Vec<CarListing> {
        let needle = self.search.to_lowercase();
        let mut out: Vec<CarListing> = cars
            .iter()
            .filter(|car| match self.brand {
                BrandFilter::All => true,
                BrandFilter::Brand(id) => car.brand_id == id,
            })
            .filter(|car| {
                if needle.is_empty() {
                    return true;
                }
                car.name.to_lowercase().contains(&needle)
                    || car
                        .brand_name
                        .as_deref()
                        .is_some_and(|b| b.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();

        // Stable sorts: ties keep their prior relative order.
        match self.sort {
            SortKey::Newest => {}
            SortKey::PriceAsc => out.sort_by(|a, b| a.price.cmp(&b.price)),
            SortKey::PriceDesc => out.sort_by(|a, b| b.price.cmp(&a.price)),
            SortKey::Name => out.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
            SortKey::Year => out.sort_by(|a, b| b.year.cmp(&a.year)),
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn listing(name: &str, brand: Uuid, brand_name: &str, price: i64, year: i32) -> CarListing {
        CarListing {
            id: Uuid::new_v4(),
            brand_id: brand,
            name: name.to_string(),
            year,
            price: Decimal::from(price),
            fuel_type: None,
            transmission: None,
            description: None,
            image_url: None,
            created_at: Utc::now(),
            brand_name: Some(brand_name.to_string()),
        }
    }

    #[test]
    fn default_query_returns_fetched_order() {
        let brand = Uuid::new_v4();
        let cars = vec![
            listing("Ranger", brand, "Ford", 30000, 2023),
            listing("Hilux", brand, "Toyota", 28000, 2024),
        ];
        let out = CatalogQuery::default().apply(&cars);
        let names: Vec<&str> = out.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Ranger", "Hilux"]);
    }

    #[test]
    fn brand_filter_retains_matching_cars_only() {
        let ford = Uuid::new_v4();
        let toyota = Uuid::new_v4();
        let cars = vec![
            listing("Ranger", ford, "Ford", 30000, 2023),
            listing("Hilux", toyota, "Toyota", 28000, 2024),
        ];
        let query = CatalogQuery {
            brand: BrandFilter::Brand(ford),
            ..CatalogQuery::default()
        };
        let out = query.apply(&cars);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "Ranger");
    }

    #[test]
    fn search_matches_name_and_brand_case_insensitively() {
        let ford = Uuid::new_v4();
        let toyota = Uuid::new_v4();
        let cars = vec![
            listing("Ranger", ford, "Ford", 30000, 2023),
            listing("Hilux", toyota, "Toyota", 28000, 2024),
        ];
        let by_name = CatalogQuery {
            search: "hilux".to_string(),
            ..CatalogQuery::default()
        };
        assert_eq!(by_name.apply(&cars).len(), 1);

        let by_brand = CatalogQuery {
            search: "FORD".to_string(),
            ..CatalogQuery::default()
        };
        assert_eq!(by_brand.apply(&cars)[0].name, "Ranger");
    }

    #[test]
    fn price_and_year_sorts() {
        let brand = Uuid::new_v4();
        let cars = vec![
            listing("Ranger", brand, "Ford", 30000, 2023),
            listing("Hilux", brand, "Toyota", 28000, 2024),
        ];
        let asc = CatalogQuery {
            sort: SortKey::PriceAsc,
            ..CatalogQuery::default()
        };
        let sorted = asc.apply(&cars);
        let names: Vec<&str> = sorted.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Hilux", "Ranger"]);

        let year = CatalogQuery {
            sort: SortKey::Year,
            ..CatalogQuery::default()
        };
        let sorted = year.apply(&cars);
        let names: Vec<&str> = sorted.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Hilux", "Ranger"]);
    }

    #[test]
    fn query_string_round_trip_with_brand() {
        let id = Uuid::new_v4();
        let query = CatalogQuery {
            brand: BrandFilter::Brand(id),
            search: "doble cabina".to_string(),
            sort: SortKey::PriceDesc,
        };
        let qs = query.to_query_string();
        assert!(qs.contains(&format!("brand={}", id)));
        assert_eq!(CatalogQuery::from_query_string(&qs), query);
    }

    #[test]
    fn all_brands_removes_the_parameter() {
        let query = CatalogQuery::default();
        assert_eq!(query.to_query_string(), "");
    }
}
