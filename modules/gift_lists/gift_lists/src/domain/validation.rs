//! Field-level constraints checked before any write is issued.

use gift_lists_sdk::{
    GroupPatch, ItemLink, ItemPatch, ListPatch, NewGroup, NewItem, NewList, UserPatch,
};
use rust_decimal::Decimal;

use crate::domain::error::DomainError;
use crate::domain::service::ServiceConfig;

const MIN_GROUP_NAME_CHARS: usize = 2;
const MAX_YEAR: i32 = 9999;

pub(super) struct Validator<'a> {
    config: &'a ServiceConfig,
    current_year: i32,
}

impl<'a> Validator<'a> {
    pub(super) fn new(config: &'a ServiceConfig, current_year: i32) -> Self {
        Self {
            config,
            current_year,
        }
    }

    pub(super) fn new_group(&self, g: &NewGroup) -> Result<(), DomainError> {
        self.group_name(&g.name)?;
        self.year(g.year)?;
        non_negative("overall_budget", g.overall_budget)
    }

    pub(super) fn group_patch(&self, p: &GroupPatch) -> Result<(), DomainError> {
        if let Some(ref name) = p.name {
            self.group_name(name)?;
        }
        if let Some(year) = p.year {
            self.year(year)?;
        }
        if let Some(budget) = p.overall_budget {
            non_negative("overall_budget", budget)?;
        }
        Ok(())
    }

    pub(super) fn new_list(&self, l: &NewList) -> Result<(), DomainError> {
        self.required_name("recipient_name", &l.recipient_name)?;
        non_negative("budget", l.budget)
    }

    pub(super) fn list_patch(&self, p: &ListPatch) -> Result<(), DomainError> {
        if let Some(ref name) = p.recipient_name {
            self.required_name("recipient_name", name)?;
        }
        if let Some(budget) = p.budget {
            non_negative("budget", budget)?;
        }
        Ok(())
    }

    pub(super) fn new_item(&self, i: &NewItem) -> Result<(), DomainError> {
        self.required_name("title", &i.title)?;
        self.text("description", &i.description)?;
        self.text("notes", &i.notes)?;
        self.links(&i.links)?;
        non_negative("estimated_price", i.estimated_price)
    }

    pub(super) fn item_patch(&self, p: &ItemPatch) -> Result<(), DomainError> {
        if let Some(ref title) = p.title {
            self.required_name("title", title)?;
        }
        if let Some(ref description) = p.description {
            self.text("description", description)?;
        }
        if let Some(ref notes) = p.notes {
            self.text("notes", notes)?;
        }
        if let Some(ref links) = p.links {
            self.links(links)?;
        }
        if let Some(price) = p.estimated_price {
            non_negative("estimated_price", price)?;
        }
        Ok(())
    }

    pub(super) fn user_patch(&self, p: &UserPatch) -> Result<(), DomainError> {
        if let Some(ref name) = p.display_name {
            self.required_name("display_name", name)?;
        }
        Ok(())
    }

    fn group_name(&self, name: &str) -> Result<(), DomainError> {
        self.required_name("name", name)?;
        if name.trim().chars().count() < MIN_GROUP_NAME_CHARS {
            return Err(DomainError::validation(
                "name",
                format!("must be at least {MIN_GROUP_NAME_CHARS} characters"),
            ));
        }
        Ok(())
    }

    fn year(&self, year: i32) -> Result<(), DomainError> {
        if year < self.current_year {
            return Err(DomainError::validation("year", "cannot be in the past"));
        }
        if year > MAX_YEAR {
            return Err(DomainError::validation(
                "year",
                format!("must not exceed {MAX_YEAR}"),
            ));
        }
        Ok(())
    }

    fn required_name(&self, field: &str, value: &str) -> Result<(), DomainError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation(field, "is required"));
        }
        let len = trimmed.chars().count();
        if len > self.config.max_name_length {
            return Err(DomainError::validation(
                field,
                format!(
                    "too long: {len} characters (max: {})",
                    self.config.max_name_length
                ),
            ));
        }
        Ok(())
    }

    fn text(&self, field: &str, value: &str) -> Result<(), DomainError> {
        let len = value.chars().count();
        if len > self.config.max_text_length {
            return Err(DomainError::validation(
                field,
                format!(
                    "too long: {len} characters (max: {})",
                    self.config.max_text_length
                ),
            ));
        }
        Ok(())
    }

    fn links(&self, links: &[ItemLink]) -> Result<(), DomainError> {
        if links.len() > self.config.max_links_per_item {
            return Err(DomainError::validation(
                "links",
                format!("at most {} links allowed", self.config.max_links_per_item),
            ));
        }
        if links.iter().any(|l| l.url.trim().is_empty()) {
            return Err(DomainError::validation("links", "link url is required"));
        }
        Ok(())
    }
}

fn non_negative(field: &str, amount: Decimal) -> Result<(), DomainError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(DomainError::validation(field, "cannot be negative"));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn group(name: &str, year: i32, budget: i64) -> NewGroup {
        NewGroup {
            name: name.to_owned(),
            year,
            overall_budget: Decimal::from(budget),
            member_ids: BTreeSet::new(),
        }
    }

    #[test]
    fn group_constraints() {
        let config = ServiceConfig::default();
        let v = Validator::new(&config, 2026);

        assert!(v.new_group(&group("Family", 2026, 0)).is_ok());
        assert!(v.new_group(&group("Family", 2027, 500)).is_ok());

        for bad in [
            group("", 2026, 10),
            group(" F ", 2026, 10),
            group("Family", 2025, 10),
            group("Family", 2026, -1),
        ] {
            let err = v.new_group(&bad).unwrap_err();
            assert!(matches!(err, DomainError::Validation { .. }), "{bad:?}");
        }
    }

    #[test]
    fn names_are_bounded_by_config() {
        let config = ServiceConfig {
            max_name_length: 5,
            ..ServiceConfig::default()
        };
        let v = Validator::new(&config, 2026);
        let patch = ListPatch {
            recipient_name: Some("Grandma".to_owned()),
            ..ListPatch::default()
        };
        let err = v.list_patch(&patch).unwrap_err();
        assert_eq!(
            err,
            DomainError::validation("recipient_name", "too long: 7 characters (max: 5)")
        );
    }

    #[test]
    fn links_need_urls_and_respect_limit() {
        let config = ServiceConfig {
            max_links_per_item: 1,
            ..ServiceConfig::default()
        };
        let v = Validator::new(&config, 2026);
        let link = |url: &str| ItemLink {
            url: url.to_owned(),
            label: "shop".to_owned(),
        };

        let blank = ItemPatch {
            links: Some(vec![link(" ")]),
            ..ItemPatch::default()
        };
        assert!(v.item_patch(&blank).is_err());

        let too_many = ItemPatch {
            links: Some(vec![link("https://a"), link("https://b")]),
            ..ItemPatch::default()
        };
        assert!(v.item_patch(&too_many).is_err());

        let ok = ItemPatch {
            links: Some(vec![link("https://a")]),
            estimated_price: Some(Decimal::ZERO),
            ..ItemPatch::default()
        };
        assert!(v.item_patch(&ok).is_ok());
    }

    #[test]
    fn empty_display_name_is_rejected() {
        let config = ServiceConfig::default();
        let v = Validator::new(&config, 2026);
        let patch = UserPatch {
            display_name: Some("   ".to_owned()),
            ..UserPatch::default()
        };
        assert_eq!(
            v.user_patch(&patch).unwrap_err(),
            DomainError::validation("display_name", "is required")
        );
    }
}
