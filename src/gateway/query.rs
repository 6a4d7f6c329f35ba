//! Typed query builder for the remote activity API.
//!
//! The remote API understands plain field filters, `field__icontains`,
//! `field__gt`, `_order_by`, pipe-joined value lists and pipe-joined
//! parameter names (the same value tested against several fields, OR-ed).

use url::form_urlencoded::byte_serialize;

/// Separator for OR-combined parameter names and multi-valued filters.
pub const OR_SEPARATOR: char = '|';

#[derive(Debug, Clone, PartialEq, Eq)]
enum Param {
    /// `field=value`
    Single { field: String, value: String },
    /// `a=value|b=value`
    AnyOf { fields: Vec<String>, value: String },
}

/// Query-string parameters for one remote API call.
///
/// Empty values are dropped on insertion, so an `ApiQuery` with no
/// parameters is exactly the "unfiltered" query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiQuery {
    params: Vec<Param>,
}

impl ApiQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a raw parameter. A name containing `|` broadcasts the value over
    /// every sub-name.
    pub fn param(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() || name.is_empty() {
            return self;
        }
        if name.contains(OR_SEPARATOR) {
            let fields: Vec<String> = name
                .split(OR_SEPARATOR)
                .filter(|f| !f.is_empty())
                .map(str::to_string)
                .collect();
            self.params.push(Param::AnyOf { fields, value });
        } else {
            self.params.push(Param::Single {
                field: name.to_string(),
                value,
            });
        }
        self
    }

    /// `field=value`
    pub fn eq(self, field: &str, value: impl Into<String>) -> Self {
        self.param(field, value)
    }

    /// `field=v1|v2|...`; an empty list adds nothing.
    pub fn one_of(self, field: &str, values: &[String]) -> Self {
        let joined = values
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(&OR_SEPARATOR.to_string());
        self.param(field, joined)
    }

    /// `field__gt=value`
    pub fn gt(self, field: &str, value: Option<u64>) -> Self {
        match value {
            Some(v) => self.param(&format!("{}__gt", field), v.to_string()),
            None => self,
        }
    }

    /// `a__icontains=text|b__icontains=text`
    pub fn icontains_any(self, fields: &[&str], text: &str) -> Self {
        let name = fields
            .iter()
            .map(|f| format!("{}__icontains", f))
            .collect::<Vec<_>>()
            .join(&OR_SEPARATOR.to_string());
        self.param(&name, text)
    }

    /// `_order_by=field`
    pub fn order_by(self, field: Option<&str>) -> Self {
        match field {
            Some(f) => self.param("_order_by", f),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Render the query string (without the leading `?`).
    ///
    /// OR-combined parameters come first, then plain parameters in insertion
    /// order. Pipes inside plain values stay literal.
    pub fn to_query_string(&self) -> String {
        let mut parts = Vec::new();

        for param in &self.params {
            if let Param::AnyOf { fields, value } = param {
                let encoded = encode(value);
                let alternatives: Vec<String> = fields
                    .iter()
                    .map(|field| format!("{}={}", encode(field), encoded))
                    .collect();
                parts.push(alternatives.join(&OR_SEPARATOR.to_string()));
            }
        }

        for param in &self.params {
            if let Param::Single { field, value } = param {
                parts.push(format!(
                    "{}={}",
                    encode(field),
                    encode(value).replace("%7C", "|")
                ));
            }
        }

        parts.join("&")
    }
}

fn encode(raw: &str) -> String {
    byte_serialize(raw.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values_are_dropped() {
        let query = ApiQuery::new()
            .eq("title", "")
            .one_of("sector_code", &[])
            .gt("total_budget", None)
            .order_by(None)
            .icontains_any(&["description", "title"], "");
        assert!(query.is_empty());
        assert_eq!(query.to_query_string(), "");
    }

    #[test]
    fn test_or_parameter_names_broadcast_the_value() {
        let query = ApiQuery::new().param("description__icontains|title__icontains", "clean water");
        assert_eq!(
            query.to_query_string(),
            "description__icontains=clean+water|title__icontains=clean+water"
        );
    }

    #[test]
    fn test_pipe_joined_values_stay_literal() {
        let query = ApiQuery::new().one_of(
            "recipient_country_code",
            &["KE".to_string(), "UG".to_string()],
        );
        assert_eq!(query.to_query_string(), "recipient_country_code=KE|UG");
    }

    #[test]
    fn test_full_search_query_layout() {
        let query = ApiQuery::new()
            .icontains_any(&["description", "title"], "hospitals")
            .one_of("recipient_country_code", &["KE".to_string()])
            .gt("total_budget", Some(10000))
            .one_of("sector_code", &["121".to_string(), "122".to_string()])
            .order_by(Some("-total_budget"));

        assert_eq!(
            query.to_query_string(),
            "description__icontains=hospitals|title__icontains=hospitals\
             &recipient_country_code=KE&total_budget__gt=10000\
             &sector_code=121|122&_order_by=-total_budget"
        );
    }

    #[test]
    fn test_special_characters_are_encoded() {
        let query = ApiQuery::new().eq("title", "water & sanitation");
        assert_eq!(query.to_query_string(), "title=water+%26+sanitation");
    }
}
