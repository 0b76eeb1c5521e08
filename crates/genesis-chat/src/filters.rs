//! Guided filter search: accumulate city, property type and intent chips
//! until all three are chosen, then emit one query.

use serde::{Deserialize, Serialize};

use crate::types::{Facet, FacetChoice};

/// Current chip selection. Each facet is replaced independently.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub city: Option<FacetChoice>,
    pub property_type: Option<FacetChoice>,
    pub intent: Option<FacetChoice>,
}

impl FilterSelection {
    /// Record `choice` for `facet`, leaving the other facets alone.
    ///
    /// When this completes the selection, returns the built query and
    /// resets the selection so the same chips cannot fire twice.
    pub fn select(&mut self, facet: Facet, choice: FacetChoice) -> Option<String> {
        *self.slot(facet) = Some(choice);

        if !self.is_complete() {
            return None;
        }

        let query = self.build_query();
        self.clear();
        Some(query)
    }

    pub fn get(&self, facet: Facet) -> Option<&FacetChoice> {
        match facet {
            Facet::City => self.city.as_ref(),
            Facet::PropertyType => self.property_type.as_ref(),
            Facet::Intent => self.intent.as_ref(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.city.is_some() && self.property_type.is_some() && self.intent.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.city.is_none() && self.property_type.is_none() && self.intent.is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Facets still to be chosen, in prompt order.
    pub fn missing(&self) -> Vec<Facet> {
        [Facet::City, Facet::PropertyType, Facet::Intent]
            .into_iter()
            .filter(|f| self.get(*f).is_none())
            .collect()
    }

    /// `"<intent> <property type> properties in <city>"`, skipping absent clauses.
    pub fn build_query(&self) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(3);
        if let Some(intent) = &self.intent {
            parts.push(intent.display().to_string());
        }
        if let Some(kind) = &self.property_type {
            parts.push(kind.display().to_string());
        }
        if let Some(city) = &self.city {
            parts.push(format!("properties in {}", city.display()));
        }
        parts.join(" ")
    }

    fn slot(&mut self, facet: Facet) -> &mut Option<FacetChoice> {
        match facet {
            Facet::City => &mut self.city,
            Facet::PropertyType => &mut self.property_type,
            Facet::Intent => &mut self.intent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chip(v: &str) -> FacetChoice {
        FacetChoice::new(v.to_lowercase(), v)
    }

    #[test]
    fn test_one_or_two_facets_never_fire() {
        let mut sel = FilterSelection::default();
        assert!(sel.select(Facet::City, chip("Mumbai")).is_none());
        assert!(sel.select(Facet::PropertyType, chip("Apartment")).is_none());
        assert_eq!(sel.missing(), vec![Facet::Intent]);
    }

    #[test]
    fn test_third_facet_fires_once_and_resets() {
        let mut sel = FilterSelection::default();
        sel.select(Facet::City, chip("Mumbai"));
        sel.select(Facet::PropertyType, chip("Apartment"));
        let query = sel.select(Facet::Intent, chip("Buy"));
        assert_eq!(query.as_deref(), Some("Buy Apartment properties in Mumbai"));
        assert!(sel.is_empty());
    }

    #[test]
    fn test_order_of_selection_does_not_matter() {
        let mut sel = FilterSelection::default();
        sel.select(Facet::Intent, chip("Rent"));
        sel.select(Facet::City, chip("Pune"));
        let query = sel.select(Facet::PropertyType, chip("Villa"));
        assert_eq!(query.as_deref(), Some("Rent Villa properties in Pune"));
    }

    #[test]
    fn test_reselecting_replaces_only_that_facet() {
        let mut sel = FilterSelection::default();
        sel.select(Facet::City, chip("Mumbai"));
        sel.select(Facet::PropertyType, chip("Apartment"));
        sel.select(Facet::City, chip("Bangalore"));
        assert_eq!(sel.city.as_ref().unwrap().label, "Bangalore");
        assert_eq!(sel.property_type.as_ref().unwrap().label, "Apartment");
        assert!(sel.intent.is_none());
    }

    #[test]
    fn test_reselecting_same_facet_does_not_fire() {
        let mut sel = FilterSelection::default();
        sel.select(Facet::City, chip("Mumbai"));
        assert!(sel.select(Facet::City, chip("Pune")).is_none());
        assert!(sel.select(Facet::City, chip("Surat")).is_none());
    }

    #[test]
    fn test_label_falls_back_to_value() {
        let mut sel = FilterSelection::default();
        sel.select(Facet::City, FacetChoice::new("Surat", ""));
        sel.select(Facet::PropertyType, FacetChoice::new("Plot", ""));
        let query = sel.select(Facet::Intent, FacetChoice::new("Buy", ""));
        assert_eq!(query.as_deref(), Some("Buy Plot properties in Surat"));
    }

    #[test]
    fn test_build_query_skips_absent_clauses() {
        let sel = FilterSelection {
            city: Some(chip("Mumbai")),
            property_type: None,
            intent: Some(chip("Buy")),
        };
        assert_eq!(sel.build_query(), "Buy properties in Mumbai");
        assert_eq!(FilterSelection::default().build_query(), "");
    }

    #[test]
    fn test_selection_can_start_over_after_firing() {
        let mut sel = FilterSelection::default();
        sel.select(Facet::City, chip("Mumbai"));
        sel.select(Facet::PropertyType, chip("Apartment"));
        sel.select(Facet::Intent, chip("Buy"));
        assert!(sel.select(Facet::Intent, chip("Rent")).is_none());
        assert_eq!(sel.missing(), vec![Facet::City, Facet::PropertyType]);
    }
}
