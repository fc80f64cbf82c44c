//! Character list query engine: filtering, sorting, and pagination.
//!
//! The engine is pure: it receives an owned snapshot of the records from a
//! [`CharacterStore`](crate::store::CharacterStore) and returns the
//! materialized result. The only nondeterminism is [`Page::Sample`].

use std::cmp::Ordering;
use std::str::FromStr;

use serde::Deserialize;

use crate::character::Character;
use crate::error::CoreError;

/// Number of records returned by [`Page::Sample`] when enough are available.
pub const SAMPLE_SIZE: usize = 20;

// ---------------------------------------------------------------------------
// Raw parameters
// ---------------------------------------------------------------------------

/// Raw list parameters as they arrive on the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<u32>,
    pub skip: Option<u32>,
    pub name: Option<String>,
    pub house: Option<String>,
    pub role: Option<String>,
    pub age: Option<i64>,
    pub age_more_than: Option<i64>,
    pub age_less_than: Option<i64>,
    pub sort_asc: Option<String>,
    pub sort_desc: Option<String>,
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Independent predicates; a record must satisfy every one that is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterFilters {
    pub name: Option<String>,
    pub house: Option<String>,
    pub role: Option<String>,
    pub age: Option<i64>,
    pub age_more_than: Option<i64>,
    pub age_less_than: Option<i64>,
}

impl CharacterFilters {
    pub fn matches(&self, character: &Character) -> bool {
        contains_ci(&character.name, self.name.as_deref())
            && contains_ci(&character.house, self.house.as_deref())
            && contains_ci(&character.role, self.role.as_deref())
            && self.age.is_none_or(|age| character.age == Some(age))
            && self
                .age_more_than
                .is_none_or(|min| character.age.is_some_and(|age| age >= min))
            && self
                .age_less_than
                .is_none_or(|max| character.age.is_some_and(|age| age <= max))
    }
}

/// Case-insensitive substring test. An unset or empty needle always matches.
fn contains_ci(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        None | Some("") => true,
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
    }
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Fields a list can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
    House,
    Animal,
    Symbol,
    Nickname,
    Role,
    Age,
    Death,
    Strength,
}

/// A comparable view of one field value.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortValue<'a> {
    Int(i64),
    Text(&'a str),
}

impl SortField {
    pub const ALL: [Self; 10] = [
        Self::Id,
        Self::Name,
        Self::House,
        Self::Animal,
        Self::Symbol,
        Self::Nickname,
        Self::Role,
        Self::Age,
        Self::Death,
        Self::Strength,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::House => "house",
            Self::Animal => "animal",
            Self::Symbol => "symbol",
            Self::Nickname => "nickname",
            Self::Role => "role",
            Self::Age => "age",
            Self::Death => "death",
            Self::Strength => "strength",
        }
    }

    fn value(self, character: &Character) -> Option<SortValue<'_>> {
        match self {
            Self::Id => Some(SortValue::Int(character.id)),
            Self::Name => Some(SortValue::Text(&character.name)),
            Self::House => Some(SortValue::Text(&character.house)),
            Self::Role => Some(SortValue::Text(&character.role)),
            Self::Animal => character.animal.as_deref().map(SortValue::Text),
            Self::Symbol => character.symbol.as_deref().map(SortValue::Text),
            Self::Nickname => character.nickname.as_deref().map(SortValue::Text),
            Self::Strength => character.strength.as_deref().map(SortValue::Text),
            Self::Age => character.age.map(SortValue::Int),
            Self::Death => character.death.map(SortValue::Int),
        }
    }

    /// Compare two records on this field. Missing values go last in either
    /// direction.
    fn compare(self, a: &Character, b: &Character, descending: bool) -> Ordering {
        match (self.value(a), self.value(b)) {
            (Some(x), Some(y)) if descending => y.cmp(&x),
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl FromStr for SortField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = Self::ALL.iter().map(|f| f.as_str()).collect();
                CoreError::InvalidQuery(format!(
                    "Invalid sort field '{s}'. Allowed: {}",
                    allowed.join(", ")
                ))
            })
    }
}

/// Requested ordering.
///
/// When both keys are given the ascending sort runs first and the descending
/// sort is applied on top of it. Both sorts are stable, so the descending key
/// is the primary order and the ascending key breaks its ties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortSpec {
    pub asc: Option<SortField>,
    pub desc: Option<SortField>,
}

impl SortSpec {
    /// Parse raw sort parameters. Empty strings count as absent.
    pub fn parse(asc: Option<&str>, desc: Option<&str>) -> Result<Self, CoreError> {
        let field = |raw: Option<&str>| {
            raw.filter(|s| !s.is_empty())
                .map(SortField::from_str)
                .transpose()
        };
        Ok(Self {
            asc: field(asc)?,
            desc: field(desc)?,
        })
    }

    pub fn is_requested(&self) -> bool {
        self.asc.is_some() || self.desc.is_some()
    }

    fn apply(&self, records: &mut [Character]) {
        if let Some(field) = self.asc {
            records.sort_by(|a, b| field.compare(a, b, false));
        }
        if let Some(field) = self.desc {
            records.sort_by(|a, b| field.compare(a, b, true));
        }
    }
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Result window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// Random sample without replacement of up to [`SAMPLE_SIZE`] records.
    Sample,
    /// Skip `skip` records, then take at most `limit`.
    Window { skip: usize, limit: usize },
}

impl Page {
    /// `limit == 0` (or no limit at all) selects [`Page::Sample`] and
    /// ignores `skip`.
    pub fn from_params(limit: Option<u32>, skip: Option<u32>) -> Self {
        match limit.unwrap_or(0) {
            0 => Self::Sample,
            limit => Self::Window {
                skip: skip.unwrap_or(0) as usize,
                limit: limit as usize,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// A fully validated list query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterQuery {
    pub filters: CharacterFilters,
    pub sort: SortSpec,
    pub page: Page,
}

impl TryFrom<&ListParams> for CharacterQuery {
    type Error = CoreError;

    fn try_from(params: &ListParams) -> Result<Self, Self::Error> {
        Ok(Self {
            filters: CharacterFilters {
                name: params.name.clone(),
                house: params.house.clone(),
                role: params.role.clone(),
                age: params.age,
                age_more_than: params.age_more_than,
                age_less_than: params.age_less_than,
            },
            sort: SortSpec::parse(params.sort_asc.as_deref(), params.sort_desc.as_deref())?,
            page: Page::from_params(params.limit, params.skip),
        })
    }
}

impl CharacterQuery {
    /// Filter, sort, then paginate `records`.
    pub fn run(&self, records: Vec<Character>) -> Vec<Character> {
        let mut matching: Vec<Character> = records
            .into_iter()
            .filter(|c| self.filters.matches(c))
            .collect();

        self.sort.apply(&mut matching);

        match self.page {
            Page::Sample => sample(matching, self.sort.is_requested()),
            Page::Window { skip, limit } => matching.into_iter().skip(skip).take(limit).collect(),
        }
    }
}

/// Validate raw parameters and run the query in one step.
pub fn list(records: Vec<Character>, params: &ListParams) -> Result<Vec<Character>, CoreError> {
    let query = CharacterQuery::try_from(params)?;
    Ok(query.run(records))
}

/// Draw up to [`SAMPLE_SIZE`] distinct records. With `keep_order` the drawn
/// records stay in their input order, otherwise they come out shuffled.
fn sample(records: Vec<Character>, keep_order: bool) -> Vec<Character> {
    let amount = SAMPLE_SIZE.min(records.len());
    let mut picked = rand::seq::index::sample(&mut rand::rng(), records.len(), amount).into_vec();
    if keep_order {
        picked.sort_unstable();
    }

    let mut slots: Vec<Option<Character>> = records.into_iter().map(Some).collect();
    picked.into_iter().filter_map(|i| slots[i].take()).collect()
}
