//! Filtering, sorting and field selection for the hotel listing.
//!
//! Query parameters arrive as `field=value` or `field[op]=value` pairs with
//! `op` one of `gt`, `gte`, `lt`, `lte` or `in`. `sort` and `select` take
//! comma-separated field names (`-` prefix for descending sort or for
//! exclusion). Only the columns named by [`HotelField`] are reachable, so
//! field names can be interpolated into SQL safely.

use std::cmp::Ordering;

use staybook_core::booking::parse_stay_date;
use staybook_core::types::Timestamp;

use super::hotel::Hotel;

/// Query parameters consumed by pagination, never treated as filters.
const RESERVED_PARAMS: [&str; 4] = ["select", "sort", "page", "limit"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotelField {
    Id,
    Name,
    Address,
    PhoneNumbers,
    CreatedAt,
    UpdatedAt,
}

impl HotelField {
    /// Accepts the snake_case column name or its camelCase form.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "id" => Some(HotelField::Id),
            "name" => Some(HotelField::Name),
            "address" => Some(HotelField::Address),
            "phone_numbers" | "phoneNumbers" => Some(HotelField::PhoneNumbers),
            "created_at" | "createdAt" => Some(HotelField::CreatedAt),
            "updated_at" | "updatedAt" => Some(HotelField::UpdatedAt),
            _ => None,
        }
    }

    /// Column name, which is also the JSON key of the serialized hotel.
    pub fn column(self) -> &'static str {
        match self {
            HotelField::Id => "id",
            HotelField::Name => "name",
            HotelField::Address => "address",
            HotelField::PhoneNumbers => "phone_numbers",
            HotelField::CreatedAt => "created_at",
            HotelField::UpdatedAt => "updated_at",
        }
    }

    fn is_list(self) -> bool {
        self == HotelField::PhoneNumbers
    }

    fn parse_value(self, raw: &str) -> Option<FilterValue> {
        match self {
            HotelField::Id => raw.trim().parse().ok().map(FilterValue::Int),
            HotelField::Name | HotelField::Address | HotelField::PhoneNumbers => {
                Some(FilterValue::Text(raw.to_string()))
            }
            HotelField::CreatedAt | HotelField::UpdatedAt => {
                parse_stay_date(raw).map(FilterValue::Time)
            }
        }
    }

    /// The values `hotel` holds for this field. List fields yield one per
    /// element.
    fn values_of(self, hotel: &Hotel) -> Vec<FilterValue> {
        match self {
            HotelField::Id => vec![FilterValue::Int(hotel.id)],
            HotelField::Name => vec![FilterValue::Text(hotel.name.clone())],
            HotelField::Address => vec![FilterValue::Text(hotel.address.clone())],
            HotelField::PhoneNumbers => hotel
                .phone_numbers
                .iter()
                .cloned()
                .map(FilterValue::Text)
                .collect(),
            HotelField::CreatedAt => vec![FilterValue::Time(hotel.created_at)],
            HotelField::UpdatedAt => vec![FilterValue::Time(hotel.updated_at)],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
}

impl FilterOp {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "gt" => Some(FilterOp::Gt),
            "gte" => Some(FilterOp::Gte),
            "lt" => Some(FilterOp::Lt),
            "lte" => Some(FilterOp::Lte),
            "in" => Some(FilterOp::In),
            _ => None,
        }
    }

    /// SQL comparison operator for the scalar operators.
    pub fn sql(self) -> &'static str {
        match self {
            FilterOp::Eq | FilterOp::In => "=",
            FilterOp::Gt => ">",
            FilterOp::Gte => ">=",
            FilterOp::Lt => "<",
            FilterOp::Lte => "<=",
        }
    }

    fn accepts(self, ordering: Ordering) -> bool {
        match self {
            FilterOp::Eq | FilterOp::In => ordering == Ordering::Equal,
            FilterOp::Gt => ordering == Ordering::Greater,
            FilterOp::Gte => ordering != Ordering::Less,
            FilterOp::Lt => ordering == Ordering::Less,
            FilterOp::Lte => ordering != Ordering::Greater,
        }
    }
}

/// A typed filter operand. The variant always matches the field's type.
#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub enum FilterValue {
    Int(i64),
    Text(String),
    Time(Timestamp),
}

/// One `field[op]=value` condition. `values` has exactly one element unless
/// `op` is [`FilterOp::In`].
#[derive(Debug, Clone, PartialEq)]
pub struct HotelFilter {
    pub field: HotelField,
    pub op: FilterOp,
    pub values: Vec<FilterValue>,
}

impl HotelFilter {
    pub fn matches(&self, hotel: &Hotel) -> bool {
        self.field.values_of(hotel).iter().any(|held| {
            self.values.iter().any(|wanted| {
                held.partial_cmp(wanted)
                    .is_some_and(|ordering| self.op.accepts(ordering))
            })
        })
    }

    pub fn ints(&self) -> Vec<i64> {
        self.values
            .iter()
            .filter_map(|v| match v {
                FilterValue::Int(i) => Some(*i),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<String> {
        self.values
            .iter()
            .filter_map(|v| match v {
                FilterValue::Text(s) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn times(&self) -> Vec<Timestamp> {
        self.values
            .iter()
            .filter_map(|v| match v {
                FilterValue::Time(t) => Some(*t),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: HotelField,
    pub descending: bool,
}

/// Which fields of each hotel to return. `id` is always kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    Include(Vec<HotelField>),
    Exclude(Vec<HotelField>),
}

impl Projection {
    pub fn keeps(&self, field: HotelField) -> bool {
        if field == HotelField::Id {
            return true;
        }
        match self {
            Projection::Include(fields) => fields.contains(&field),
            Projection::Exclude(fields) => !fields.contains(&field),
        }
    }

    /// JSON keys of a serialized hotel this projection drops.
    pub fn dropped_keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        ALL_FIELDS
            .into_iter()
            .filter(|f| !self.keeps(*f))
            .map(HotelField::column)
    }
}

const ALL_FIELDS: [HotelField; 6] = [
    HotelField::Id,
    HotelField::Name,
    HotelField::Address,
    HotelField::PhoneNumbers,
    HotelField::CreatedAt,
    HotelField::UpdatedAt,
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HotelQueryError {
    #[error("Unknown hotel field '{0}'")]
    UnknownField(String),

    #[error("Unknown filter operator '{0}'")]
    UnknownOperator(String),

    #[error("Invalid value '{value}' for hotel field '{field}'")]
    InvalidValue { field: &'static str, value: String },

    #[error("Field '{0}' can only be filtered by equality or 'in'")]
    UnorderedField(&'static str),

    #[error("Field '{0}' cannot be used for sorting")]
    UnsortableField(&'static str),

    #[error("select cannot mix included and excluded fields")]
    MixedProjection,
}

/// Parsed hotel listing query.
#[derive(Debug, Clone, PartialEq)]
pub struct HotelQuery {
    pub filters: Vec<HotelFilter>,
    /// Never empty; defaults to newest first.
    pub sort: Vec<SortKey>,
    pub select: Option<Projection>,
}

impl Default for HotelQuery {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            sort: vec![SortKey {
                field: HotelField::CreatedAt,
                descending: true,
            }],
            select: None,
        }
    }
}

impl HotelQuery {
    /// Build a query from raw query-string pairs.
    pub fn from_params<'a, I>(params: I) -> Result<Self, HotelQueryError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut query = HotelQuery::default();
        for (key, value) in params {
            match key {
                "sort" => query.sort = parse_sort(value)?,
                "select" => query.select = parse_select(value)?,
                _ if RESERVED_PARAMS.contains(&key) => {}
                _ => query.filters.push(parse_filter(key, value)?),
            }
        }
        Ok(query)
    }

    pub fn matches(&self, hotel: &Hotel) -> bool {
        self.filters.iter().all(|f| f.matches(hotel))
    }

    /// Order two hotels by the sort keys, breaking ties by descending id.
    pub fn compare(&self, a: &Hotel, b: &Hotel) -> Ordering {
        self.sort
            .iter()
            .map(|key| {
                let ordering = key
                    .field
                    .values_of(a)
                    .partial_cmp(&key.field.values_of(b))
                    .unwrap_or(Ordering::Equal);
                if key.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| b.id.cmp(&a.id))
    }

    /// `ORDER BY` body, with a descending id tiebreak.
    pub fn order_by_sql(&self) -> String {
        let mut keys: Vec<String> = self
            .sort
            .iter()
            .map(|key| {
                let direction = if key.descending { "DESC" } else { "ASC" };
                format!("{} {direction}", key.field.column())
            })
            .collect();
        keys.push("id DESC".to_string());
        keys.join(", ")
    }
}

fn parse_field(name: &str) -> Result<HotelField, HotelQueryError> {
    HotelField::parse(name.trim()).ok_or_else(|| HotelQueryError::UnknownField(name.to_string()))
}

fn parse_filter(key: &str, raw: &str) -> Result<HotelFilter, HotelQueryError> {
    let (name, op) = match key.split_once('[') {
        Some((name, rest)) => {
            let op = rest.strip_suffix(']').unwrap_or(rest);
            let op = FilterOp::parse(op)
                .ok_or_else(|| HotelQueryError::UnknownOperator(op.to_string()))?;
            (name, op)
        }
        None => (key, FilterOp::Eq),
    };
    let field = parse_field(name)?;

    if field.is_list() && !matches!(op, FilterOp::Eq | FilterOp::In) {
        return Err(HotelQueryError::UnorderedField(field.column()));
    }

    let raw_values: Vec<&str> = if op == FilterOp::In {
        raw.split(',').collect()
    } else {
        vec![raw]
    };
    let values = raw_values
        .into_iter()
        .map(|v| {
            field
                .parse_value(v)
                .ok_or_else(|| HotelQueryError::InvalidValue {
                    field: field.column(),
                    value: v.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(HotelFilter { field, op, values })
}

fn parse_sort(raw: &str) -> Result<Vec<SortKey>, HotelQueryError> {
    let keys = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|item| {
            let (name, descending) = match item.strip_prefix('-') {
                Some(name) => (name, true),
                None => (item, false),
            };
            let field = parse_field(name)?;
            if field.is_list() {
                return Err(HotelQueryError::UnsortableField(field.column()));
            }
            Ok(SortKey { field, descending })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if keys.is_empty() {
        Ok(HotelQuery::default().sort)
    } else {
        Ok(keys)
    }
}

fn parse_select(raw: &str) -> Result<Option<Projection>, HotelQueryError> {
    let mut include = Vec::new();
    let mut exclude = Vec::new();
    for item in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match item.strip_prefix('-') {
            Some(name) => exclude.push(parse_field(name)?),
            None => include.push(parse_field(item)?),
        }
    }
    match (include.is_empty(), exclude.is_empty()) {
        (true, true) => Ok(None),
        (false, true) => Ok(Some(Projection::Include(include))),
        (true, false) => Ok(Some(Projection::Exclude(exclude))),
        (false, false) => Err(HotelQueryError::MixedProjection),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    use super::*;

    fn hotel(id: i64, name: &str, day: u32) -> Hotel {
        let at = Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap();
        Hotel {
            id,
            name: name.to_string(),
            address: format!("{id} Main St"),
            phone_numbers: vec![format!("555-000{id}")],
            created_at: at,
            updated_at: at,
        }
    }

    fn query(pairs: &[(&str, &str)]) -> Result<HotelQuery, HotelQueryError> {
        HotelQuery::from_params(pairs.iter().copied())
    }

    #[test]
    fn defaults_to_newest_first_without_filters() {
        let q = query(&[("page", "2"), ("limit", "5")]).unwrap();
        assert_eq!(q, HotelQuery::default());
        assert_eq!(q.order_by_sql(), "created_at DESC, id DESC");
    }

    #[test]
    fn parses_operators() {
        let q = query(&[("id[gte]", "3"), ("name", "Ritz"), ("id[in]", "1,2")]).unwrap();
        assert_eq!(q.filters.len(), 3);
        assert_eq!(q.filters[0].op, FilterOp::Gte);
        assert_eq!(q.filters[0].values, vec![FilterValue::Int(3)]);
        assert_eq!(q.filters[1].op, FilterOp::Eq);
        assert_eq!(q.filters[2].ints(), vec![1, 2]);
    }

    #[test]
    fn rejects_unknown_fields_and_operators() {
        assert_matches!(
            query(&[("password_hash", "x")]),
            Err(HotelQueryError::UnknownField(f)) if f == "password_hash"
        );
        assert_matches!(
            query(&[("id[ne]", "1")]),
            Err(HotelQueryError::UnknownOperator(op)) if op == "ne"
        );
        assert_matches!(
            query(&[("id[gt]", "abc")]),
            Err(HotelQueryError::InvalidValue { field: "id", .. })
        );
        assert_matches!(
            query(&[("phone_numbers[gt]", "1")]),
            Err(HotelQueryError::UnorderedField("phone_numbers"))
        );
        assert_matches!(
            query(&[("sort", "phoneNumbers")]),
            Err(HotelQueryError::UnsortableField("phone_numbers"))
        );
        assert_matches!(
            query(&[("select", "name,-address")]),
            Err(HotelQueryError::MixedProjection)
        );
    }

    #[test]
    fn filters_match_in_memory() {
        let a = hotel(1, "Alpha", 1);
        let b = hotel(2, "Bravo", 2);

        let q = query(&[("created_at[gt]", "2024-01-01")]).unwrap();
        assert!(!q.matches(&a));
        assert!(q.matches(&b));

        let q = query(&[("name[in]", "Alpha,Charlie")]).unwrap();
        assert!(q.matches(&a));
        assert!(!q.matches(&b));

        let q = query(&[("phone_numbers", "555-0002")]).unwrap();
        assert!(q.matches(&b));
        assert!(!q.matches(&a));
    }

    #[test]
    fn sort_keys_and_tiebreak() {
        let a = hotel(1, "Same", 1);
        let b = hotel(2, "Same", 2);

        let q = query(&[("sort", "name")]).unwrap();
        assert_eq!(q.compare(&a, &b), Ordering::Greater);

        let q = query(&[("sort", "createdAt")]).unwrap();
        assert_eq!(q.compare(&a, &b), Ordering::Less);
        assert_eq!(q.order_by_sql(), "created_at ASC, id DESC");

        let q = query(&[("sort", "-name,id")]).unwrap();
        assert_eq!(q.order_by_sql(), "name DESC, id ASC, id DESC");
    }

    #[test]
    fn projection_always_keeps_id() {
        let q = query(&[("select", "name,address")]).unwrap();
        let projection = q.select.unwrap();
        assert!(projection.keeps(HotelField::Id));
        assert!(projection.keeps(HotelField::Name));
        let dropped: Vec<_> = projection.dropped_keys().collect();
        assert_eq!(dropped, vec!["phone_numbers", "created_at", "updated_at"]);

        let q = query(&[("select", "-phoneNumbers,-id")]).unwrap();
        let dropped: Vec<_> = q.select.unwrap().dropped_keys().collect();
        assert_eq!(dropped, vec!["phone_numbers"]);
    }
}
