//! Static catalog of the BCB indicators the dashboard knows about.
//!
//! Each indicator maps either to one SGS series or to a table of
//! sub-categories (municipality, sector), each with its own series. The tables
//! are `const` data: built at compile time, never mutated.

use clap::ValueEnum;

use crate::domain::SeriesId;
use crate::error::AppError;

/// Basic food basket cost per capital city (DIEESE, via SGS).
const CESTA_BASICA: &[(&str, SeriesId)] = &[
    ("Aracaju", SeriesId::known(7479)),
    ("Belém", SeriesId::known(7480)),
    ("Belo Horizonte", SeriesId::known(7481)),
    ("Brasília", SeriesId::known(7482)),
    ("Curitiba", SeriesId::known(7483)),
    ("Florianópolis", SeriesId::known(7484)),
    ("Fortaleza", SeriesId::known(7485)),
    ("Goiânia", SeriesId::known(7486)),
    ("João Pessoa", SeriesId::known(7487)),
    ("Natal", SeriesId::known(7488)),
    ("Porto Alegre", SeriesId::known(7489)),
    ("Recife", SeriesId::known(7490)),
    ("Rio de Janeiro", SeriesId::known(7491)),
    ("Salvador", SeriesId::known(7492)),
    ("São Paulo", SeriesId::known(7493)),
    ("Vitória", SeriesId::known(7494)),
];

/// Formal employment index per economic sector.
const EMPREGO_FORMAL: &[(&str, SeriesId)] = &[
    ("Total", SeriesId::known(25239)),
    ("Indústria da Transformação", SeriesId::known(25241)),
    ("Comércio", SeriesId::known(25256)),
    ("Serviços", SeriesId::known(25257)),
    ("Construção Civil", SeriesId::known(25255)),
];

const IPCA: SeriesId = SeriesId::known(433);
const SELIC: SeriesId = SeriesId::known(4189);
const CAMBIO: SeriesId = SeriesId::known(1);

const UNIT_BRL: &str = "R$";
const UNIT_PERCENT: &str = "%";
const UNIT_INDEX_2013: &str = "Índice (base 2013 = 100)";

/// Unit lookup keyed by indicator display name.
///
/// Kept separate from `Indicator::unit` on purpose: the tests check that the
/// two never drift apart.
const UNITS: &[(&str, &str)] = &[
    ("IPCA", UNIT_PERCENT),
    ("Taxa Selic", UNIT_PERCENT),
    ("Câmbio", UNIT_BRL),
    ("Cesta Básica", UNIT_BRL),
    ("Índice de Emprego Formal", UNIT_INDEX_2013),
];

/// Indicators offered by the dashboard, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Indicator {
    /// Basic food basket cost, per municipality.
    CestaBasica,
    /// Formal employment index, per sector.
    EmpregoFormal,
    /// IPCA consumer inflation.
    Ipca,
    /// Selic policy interest rate.
    Selic,
    /// USD/BRL exchange rate.
    Cambio,
}

/// Where an indicator's series id comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorSeries {
    Single(SeriesId),
    ByCategory(&'static [(&'static str, SeriesId)]),
}

impl Indicator {
    pub const ALL: [Indicator; 5] = [
        Indicator::CestaBasica,
        Indicator::EmpregoFormal,
        Indicator::Ipca,
        Indicator::Selic,
        Indicator::Cambio,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Indicator::CestaBasica => "Cesta Básica",
            Indicator::EmpregoFormal => "Índice de Emprego Formal",
            Indicator::Ipca => "IPCA",
            Indicator::Selic => "Taxa Selic",
            Indicator::Cambio => "Câmbio",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Indicator::CestaBasica | Indicator::Cambio => UNIT_BRL,
            Indicator::EmpregoFormal => UNIT_INDEX_2013,
            Indicator::Ipca | Indicator::Selic => UNIT_PERCENT,
        }
    }

    pub fn series(self) -> IndicatorSeries {
        match self {
            Indicator::CestaBasica => IndicatorSeries::ByCategory(CESTA_BASICA),
            Indicator::EmpregoFormal => IndicatorSeries::ByCategory(EMPREGO_FORMAL),
            Indicator::Ipca => IndicatorSeries::Single(IPCA),
            Indicator::Selic => IndicatorSeries::Single(SELIC),
            Indicator::Cambio => IndicatorSeries::Single(CAMBIO),
        }
    }

    /// What the sub-category menu is called, if the indicator has one.
    pub fn category_label(self) -> Option<&'static str> {
        match self {
            Indicator::CestaBasica => Some("Municipality"),
            Indicator::EmpregoFormal => Some("Sector"),
            Indicator::Ipca | Indicator::Selic | Indicator::Cambio => None,
        }
    }

    /// Sub-category names in menu order (empty for single-series indicators).
    pub fn categories(self) -> Vec<&'static str> {
        match self.series() {
            IndicatorSeries::Single(_) => Vec::new(),
            IndicatorSeries::ByCategory(table) => table.iter().map(|(name, _)| *name).collect(),
        }
    }

    /// Resolve the series to fetch for an optional sub-category.
    ///
    /// Categorised indicators default to their first entry. Category names
    /// match exactly first, then case-insensitively.
    pub fn resolve(self, category: Option<&str>) -> Result<Resolved, AppError> {
        match (self.series(), category) {
            (IndicatorSeries::Single(id), None) => Ok(Resolved {
                indicator: self,
                category: None,
                series: id,
            }),
            (IndicatorSeries::Single(_), Some(name)) => Err(AppError::input(format!(
                "{} has no sub-categories (got '{name}').",
                self.display_name()
            ))),
            (IndicatorSeries::ByCategory(table), None) => {
                let (name, id) = table[0];
                Ok(Resolved {
                    indicator: self,
                    category: Some(name),
                    series: id,
                })
            }
            (IndicatorSeries::ByCategory(table), Some(wanted)) => {
                let wanted = wanted.trim();
                let hit = table
                    .iter()
                    .find(|(name, _)| *name == wanted)
                    .or_else(|| table.iter().find(|(name, _)| name.to_lowercase() == wanted.to_lowercase()));
                match hit {
                    Some(&(name, id)) => Ok(Resolved {
                        indicator: self,
                        category: Some(name),
                        series: id,
                    }),
                    None => Err(AppError::input(format!(
                        "Unknown {} '{wanted}' for {}. Options: {}",
                        self.category_label().unwrap_or("category").to_lowercase(),
                        self.display_name(),
                        self.categories().join(", ")
                    ))),
                }
            }
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|i| *i == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|i| *i == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// A fully resolved selection: the indicator, its sub-category (if any) and
/// the SGS series to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub indicator: Indicator,
    pub category: Option<&'static str>,
    pub series: SeriesId,
}

impl Resolved {
    /// Title used by the report and the TUI header, e.g. `Cesta Básica - Recife`.
    pub fn title(&self) -> String {
        match self.category {
            Some(category) => format!("{} - {category}", self.indicator.display_name()),
            None => self.indicator.display_name().to_string(),
        }
    }

    pub fn unit(&self) -> &'static str {
        self.indicator.unit()
    }
}

/// Unit label for an indicator display name, from the standalone lookup table.
pub fn unit_for(display_name: &str) -> Option<&'static str> {
    UNITS
        .iter()
        .find(|(name, _)| *name == display_name)
        .map(|(_, unit)| *unit)
}

/// Step through an indicator's sub-categories, wrapping at both ends.
pub fn cycle_category(indicator: Indicator, current: Option<&str>, delta: i32) -> Option<&'static str> {
    let names = indicator.categories();
    if names.is_empty() {
        return None;
    }
    let idx = current
        .and_then(|c| names.iter().position(|n| *n == c))
        .unwrap_or(0) as i64;
    let len = names.len() as i64;
    let next = (idx + i64::from(delta)).rem_euclid(len) as usize;
    Some(names[next])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units_agree_with_lookup_table() {
        for indicator in Indicator::ALL {
            assert_eq!(
                unit_for(indicator.display_name()),
                Some(indicator.unit()),
                "unit mismatch for {}",
                indicator.display_name()
            );
        }
        assert_eq!(UNITS.len(), Indicator::ALL.len());
    }

    #[test]
    fn every_series_id_is_positive() {
        for indicator in Indicator::ALL {
            match indicator.series() {
                IndicatorSeries::Single(id) => assert!(id.code() > 0),
                IndicatorSeries::ByCategory(table) => {
                    assert!(!table.is_empty());
                    assert!(table.iter().all(|(_, id)| id.code() > 0));
                }
            }
        }
    }

    #[test]
    fn categorised_indicators_default_to_first_entry() {
        let resolved = Indicator::CestaBasica.resolve(None).unwrap();
        assert_eq!(resolved.category, Some("Aracaju"));
        assert_eq!(resolved.series.code(), 7479);
        assert_eq!(resolved.title(), "Cesta Básica - Aracaju");
    }

    #[test]
    fn category_lookup_is_case_insensitive_fallback() {
        let resolved = Indicator::EmpregoFormal.resolve(Some("comércio")).unwrap();
        assert_eq!(resolved.category, Some("Comércio"));
        assert_eq!(resolved.series.code(), 25256);

        let resolved = Indicator::CestaBasica.resolve(Some("São Paulo")).unwrap();
        assert_eq!(resolved.series.code(), 7493);
    }

    #[test]
    fn unknown_or_unexpected_category_is_input_error() {
        let err = Indicator::CestaBasica.resolve(Some("Manaus")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("Manaus"));

        let err = Indicator::Ipca.resolve(Some("Total")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn single_series_indicators_resolve_directly() {
        assert_eq!(Indicator::Ipca.resolve(None).unwrap().series.code(), 433);
        assert_eq!(Indicator::Selic.resolve(None).unwrap().series.code(), 4189);
        assert_eq!(Indicator::Cambio.resolve(None).unwrap().series.code(), 1);
        assert_eq!(Indicator::Cambio.resolve(None).unwrap().title(), "Câmbio");
    }

    #[test]
    fn cycling_wraps_around() {
        assert_eq!(Indicator::Cambio.next(), Indicator::CestaBasica);
        assert_eq!(Indicator::CestaBasica.prev(), Indicator::Cambio);

        assert_eq!(cycle_category(Indicator::EmpregoFormal, Some("Total"), -1), Some("Construção Civil"));
        assert_eq!(cycle_category(Indicator::EmpregoFormal, Some("Construção Civil"), 1), Some("Total"));
        assert_eq!(cycle_category(Indicator::Selic, None, 1), None);
    }
}
