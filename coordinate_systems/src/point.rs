use crate::coordinate_system::CoordinateSystem;
use crate::point_coordinate::PointCoordinate;
use crate::CoordinateSystemError;
use nalgebra::Vector3;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use symbolic::{EquivalenceSettings, Expr, Symbol};
use uuid::Uuid;

/// An abstract point, known only by identity.
///
/// Two point symbols are equal only if one is a clone of the other, regardless of name.
#[derive(Clone, Debug)]
pub struct PointSymbol {
    id: Uuid,
    name: Arc<str>,
    latex: Arc<str>,
}

impl PointSymbol {
    /// Creates a point with a fresh identity. The LaTeX form defaults to the display name.
    pub fn new(display_name: &str, display_latex: Option<&str>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: Arc::from(display_name),
            latex: Arc::from(display_latex.unwrap_or(display_name)),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn latex(&self) -> &str {
        &self.latex
    }
}

impl PartialEq for PointSymbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PointSymbol {}

impl fmt::Display for PointSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Creates point symbols with generated names `PT1`, `PT2`, ...
///
/// Counters are kept per prefix and belong to the factory, so independent factories number
/// their points independently.
#[derive(Debug)]
pub struct PointFactory {
    prefix: String,
    next_id: HashMap<String, usize>,
}

impl Default for PointFactory {
    fn default() -> Self {
        Self::with_prefix(Self::DEFAULT_PREFIX)
    }
}

impl PointFactory {
    pub const DEFAULT_PREFIX: &'static str = "PT";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            next_id: HashMap::new(),
        }
    }

    /// Returns the next generated name for `prefix`, starting at 1.
    pub fn next_name(&mut self, prefix: &str) -> String {
        let id = self.next_id.entry(prefix.to_string()).or_insert(0);
        *id += 1;
        format!("{prefix}{id}")
    }

    /// Creates a new point symbol.
    ///
    /// # Arguments
    ///
    /// * `display_name` - Name to display. A name is generated from the factory's prefix when
    ///   omitted.
    /// * `display_latex` - LaTeX form, defaulting to the display name.
    pub fn new_point(&mut self, display_name: Option<&str>, display_latex: Option<&str>) -> PointSymbol {
        let name = match display_name {
            Some(name) => name.to_string(),
            None => {
                let prefix = self.prefix.clone();
                self.next_name(&prefix)
            }
        };
        PointSymbol::new(&name, display_latex)
    }
}

/// A point given by explicit coordinates in a coordinate system.
#[derive(Clone, Debug)]
pub struct AppliedPoint {
    coordinates: [Expr; 3],
    system: CoordinateSystem,
}

impl AppliedPoint {
    /// Creates a point from exactly three coordinates, ordered like the system's base scalars.
    pub fn new<I, E>(coordinates: I, system: &CoordinateSystem) -> Result<Self, CoordinateSystemError>
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        let coordinates: Vec<Expr> = coordinates.into_iter().map(Into::into).collect();
        let got = coordinates.len();
        let coordinates = <[Expr; 3]>::try_from(coordinates).map_err(|_| {
            CoordinateSystemError::WrongArity {
                what: "point coordinates",
                got,
            }
        })?;
        Ok(Self {
            coordinates,
            system: system.clone(),
        })
    }

    /// Creates a point from a map keyed by the system's base scalars.
    pub fn from_mapping(
        mapping: &HashMap<Symbol, Expr>,
        system: &CoordinateSystem,
    ) -> Result<Self, CoordinateSystemError> {
        if let Some(foreign) = mapping.keys().find(|s| system.scalar_index(s).is_none()) {
            return Err(CoordinateSystemError::ForeignScalar {
                scalar: foreign.to_string(),
                system: system.to_string(),
            });
        }
        if mapping.len() != 3 {
            return Err(CoordinateSystemError::WrongArity {
                what: "point coordinates",
                got: mapping.len(),
            });
        }
        let coordinates = system
            .base_scalars()
            .iter()
            .filter_map(|s| mapping.get(s).cloned());
        Self::new(coordinates, system)
    }

    pub fn system(&self) -> &CoordinateSystem {
        &self.system
    }

    pub fn coordinates(&self) -> &[Expr; 3] {
        &self.coordinates
    }

    /// The coordinate bound to `scalar`, which must be a base scalar of this point's system.
    pub fn get(&self, scalar: &Symbol) -> Result<&Expr, CoordinateSystemError> {
        self.system
            .scalar_index(scalar)
            .map(|i| &self.coordinates[i])
            .ok_or_else(|| CoordinateSystemError::ForeignScalar {
                scalar: scalar.to_string(),
                system: self.system.to_string(),
            })
    }

    /// The coordinates keyed by base scalar.
    pub fn mapping(&self) -> HashMap<Symbol, Expr> {
        self.system.substitution(&self.coordinates)
    }

    /// True if both points live in the same system and their coordinates are equivalent.
    pub fn equivalent(&self, other: &AppliedPoint, settings: &EquivalenceSettings) -> bool {
        self.system == other.system
            && self
                .coordinates
                .iter()
                .zip(&other.coordinates)
                .all(|(a, b)| a.equivalent(b, settings))
    }

    /// Cartesian position of a point whose coordinates are all numeric.
    pub fn to_cartesian_f64(&self) -> Result<Vector3<f64>, CoordinateSystemError> {
        let mut q = Vector3::zeros();
        for (i, coordinate) in self.coordinates.iter().enumerate() {
            q[i] = coordinate
                .to_f64()
                .map_err(|_| CoordinateSystemError::NotNumeric(coordinate.to_string()))?;
        }
        Ok(self.system.geometry().to_cartesian_f64(&q))
    }
}

impl PartialEq for AppliedPoint {
    fn eq(&self, other: &Self) -> bool {
        self.equivalent(other, &EquivalenceSettings::default())
    }
}

impl fmt::Display for AppliedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.system.base_scalars();
        let [qa, qb, qc] = &self.coordinates;
        write!(f, "Point({a}={qa}, {b}={qb}, {c}={qc})")
    }
}

/// A location in space, either abstract or with explicit coordinates.
///
/// Symbolic and applied points never compare equal to each other.
#[derive(Clone, Debug, PartialEq)]
pub enum Point {
    Symbolic(PointSymbol),
    Applied(AppliedPoint),
}

impl Point {
    pub fn symbolic(display_name: &str, display_latex: Option<&str>) -> Self {
        Point::Symbolic(PointSymbol::new(display_name, display_latex))
    }

    pub fn applied<I, E>(coordinates: I, system: &CoordinateSystem) -> Result<Self, CoordinateSystemError>
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        Ok(Point::Applied(AppliedPoint::new(coordinates, system)?))
    }

    /// The point's coordinate along `scalar`. See [`PointCoordinate`].
    pub fn coordinate(&self, scalar: &Symbol) -> Result<Expr, CoordinateSystemError> {
        PointCoordinate::new(self, scalar)
    }

    /// The system an applied point is expressed in.
    pub fn system(&self) -> Option<&CoordinateSystem> {
        match self {
            Point::Symbolic(_) => None,
            Point::Applied(point) => Some(point.system()),
        }
    }

    pub fn as_applied(&self) -> Option<&AppliedPoint> {
        match self {
            Point::Symbolic(_) => None,
            Point::Applied(point) => Some(point),
        }
    }

    pub fn to_cartesian_f64(&self) -> Result<Vector3<f64>, CoordinateSystemError> {
        match self {
            Point::Symbolic(point) => Err(CoordinateSystemError::NotNumeric(point.to_string())),
            Point::Applied(point) => point.to_cartesian_f64(),
        }
    }
}

impl From<PointSymbol> for Point {
    fn from(point: PointSymbol) -> Self {
        Point::Symbolic(point)
    }
}

impl From<AppliedPoint> for Point {
    fn from(point: AppliedPoint) -> Self {
        Point::Applied(point)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Point::Symbolic(point) => write!(f, "{point}"),
            Point::Applied(point) => write!(f, "{point}"),
        }
    }
}
