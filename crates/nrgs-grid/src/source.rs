//! Generation sources and the canonical source catalog.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, GridResult};

/// Generation technology. Doubles as the source name in tables and files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Nuclear,
    Geothermal,
    Hydro,
    Wind,
    Solar,
    Thermal,
}

impl SourceKind {
    pub const ALL: [SourceKind; 6] = [
        SourceKind::Nuclear,
        SourceKind::Geothermal,
        SourceKind::Hydro,
        SourceKind::Wind,
        SourceKind::Solar,
        SourceKind::Thermal,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SourceKind::Nuclear => "nuclear",
            SourceKind::Geothermal => "geothermal",
            SourceKind::Hydro => "hydro",
            SourceKind::Wind => "wind",
            SourceKind::Solar => "solar",
            SourceKind::Thermal => "thermal",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SourceKind {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|k| trimmed.eq_ignore_ascii_case(k.name()))
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|k| k.name()).collect();
                GridError::configuration(format!(
                    "unknown generation source '{s}' (expected one of: {})",
                    valid.join(", ")
                ))
            })
    }
}

/// Static data of one generation source.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationSource {
    pub kind: SourceKind,
    /// Nameplate capacity available in every hour (MW)
    pub capacity_mw: f64,
    /// Variable cost (USD/MWh)
    pub variable_cost_usd_per_mwh: f64,
}

impl GenerationSource {
    pub fn new(kind: SourceKind, capacity_mw: f64, variable_cost_usd_per_mwh: f64) -> Self {
        Self {
            kind,
            capacity_mw,
            variable_cost_usd_per_mwh,
        }
    }

    fn validate(&self) -> GridResult<()> {
        if !self.capacity_mw.is_finite() || self.capacity_mw < 0.0 {
            return Err(GridError::configuration(format!(
                "{}: capacity_mw must be finite and >= 0 (got {})",
                self.kind, self.capacity_mw
            )));
        }
        if !self.variable_cost_usd_per_mwh.is_finite() || self.variable_cost_usd_per_mwh < 0.0 {
            return Err(GridError::configuration(format!(
                "{}: variable_cost_usd_per_mwh must be finite and >= 0 (got {})",
                self.kind, self.variable_cost_usd_per_mwh
            )));
        }
        Ok(())
    }
}

/// Canonical source configuration in declaration order.
///
/// Never mutated by dispatch; scenario calls work on copies.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceCatalog {
    sources: Vec<GenerationSource>,
}

impl SourceCatalog {
    /// Validates each source and rejects duplicates or an empty set.
    pub fn new(sources: Vec<GenerationSource>) -> GridResult<Self> {
        if sources.is_empty() {
            return Err(GridError::configuration("no generation sources configured"));
        }
        for (i, src) in sources.iter().enumerate() {
            src.validate()?;
            if sources[..i].iter().any(|other| other.kind == src.kind) {
                return Err(GridError::configuration(format!(
                    "duplicate generation source '{}'",
                    src.kind
                )));
            }
        }
        Ok(Self { sources })
    }

    /// Illustrative Kenyan baseline mix with a 1 GW nuclear unit.
    pub fn kenya_baseline() -> Self {
        Self {
            sources: vec![
                GenerationSource::new(SourceKind::Geothermal, 950.0, 14.0),
                GenerationSource::new(SourceKind::Hydro, 840.0, 5.0),
                GenerationSource::new(SourceKind::Wind, 435.0, 2.0),
                GenerationSource::new(SourceKind::Solar, 210.0, 1.0),
                GenerationSource::new(SourceKind::Nuclear, 1000.0, 9.0),
                GenerationSource::new(SourceKind::Thermal, 560.0, 180.0),
            ],
        }
    }

    pub fn sources(&self) -> &[GenerationSource] {
        &self.sources
    }

    pub fn get(&self, kind: SourceKind) -> Option<&GenerationSource> {
        self.sources.iter().find(|s| s.kind == kind)
    }

    pub fn total_capacity_mw(&self) -> f64 {
        self.sources.iter().map(|s| s.capacity_mw).sum()
    }

    /// Per-call copy: nuclear dropped unless included, hydro scaled by `hydro_factor`.
    pub fn working_set(&self, include_nuclear: bool, hydro_factor: f64) -> Vec<GenerationSource> {
        self.sources
            .iter()
            .filter(|s| include_nuclear || s.kind != SourceKind::Nuclear)
            .map(|s| {
                let mut src = *s;
                if src.kind == SourceKind::Hydro {
                    src.capacity_mw *= hydro_factor;
                }
                src
            })
            .collect()
    }
}

impl Default for SourceCatalog {
    fn default() -> Self {
        Self::kenya_baseline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_round_trip() {
        for kind in SourceKind::ALL {
            assert_eq!(kind.name().parse::<SourceKind>().unwrap(), kind);
        }
        assert_eq!("Hydro".parse::<SourceKind>().unwrap(), SourceKind::Hydro);
        let err = "coal".parse::<SourceKind>().unwrap_err();
        assert!(matches!(err, GridError::Configuration { .. }));
    }

    #[test]
    fn catalog_validation() {
        let dup = SourceCatalog::new(vec![
            GenerationSource::new(SourceKind::Hydro, 100.0, 5.0),
            GenerationSource::new(SourceKind::Hydro, 200.0, 6.0),
        ]);
        assert!(matches!(dup, Err(GridError::Configuration { .. })));

        let negative = GenerationSource::new(SourceKind::Wind, -1.0, 2.0);
        assert!(SourceCatalog::new(vec![negative]).is_err());

        let nan_cost = GenerationSource::new(SourceKind::Wind, 1.0, f64::NAN);
        assert!(SourceCatalog::new(vec![nan_cost]).is_err());

        assert!(SourceCatalog::new(Vec::new()).is_err());
    }

    #[test]
    fn builtin_catalog_is_valid() {
        let cat = SourceCatalog::kenya_baseline();
        assert!(SourceCatalog::new(cat.sources().to_vec()).is_ok());
        assert_eq!(cat.total_capacity_mw(), 3995.0);
    }

    #[test]
    fn working_set_leaves_catalog_untouched() {
        let cat = SourceCatalog::kenya_baseline();
        let ws = cat.working_set(false, 0.4);
        assert!(ws.iter().all(|s| s.kind != SourceKind::Nuclear));
        let hydro = ws.iter().find(|s| s.kind == SourceKind::Hydro).unwrap();
        assert_eq!(hydro.capacity_mw, 840.0 * 0.4);
        assert_eq!(cat.get(SourceKind::Hydro).unwrap().capacity_mw, 840.0);
        assert_eq!(cat.working_set(true, 1.0), cat.sources());
    }
}
