//! Lookup tables for the F2L, OLL and PLL phases.
//!
//! The tables are plain data: keys read off a cube held the solving way up, mapped to the moves
//! that solve it. They are stored as one JSON file,
//!
//! ```json
//! {
//!   "edges": { "FR": "R U R'" },
//!   "pairs": { "UF": { "UFR:U:true": "U R U' R'" } },
//!   "oll": { "<54 character up-color pattern>": "R U R' U R U2 R'" },
//!   "pll": { "FFFRRRBBBLLL": "" }
//! }
//! ```
//!
//! and can be derived from scratch with [`LookupTables::discover`], which searches outwards from
//! a solved cube with algorithms that keep the already solved part of the cube intact.

use super::{is_f2l_solved, is_oll_solved, orient_cube};
use crate::cube333::discovery::{
    discover, CancelToken, DiscoveryConfig, DiscoveryOutcome, Generator,
};
use crate::cube333::moves::{Layer, Move};
use crate::cube333::pattern::WILDCARD;
use crate::cube333::{Color, Cube, Face, Position};
use crate::error::{InvalidMoveError, KeyError, SearchError, TableError};
use crate::moves::{Move as _, MoveSequence};

use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Moves that lift the pieces out of each middle layer slot and put only top layer pieces back.
const EXTRACTIONS: [(Position, &str); 4] = [
    (Position::FR, "R U R'"),
    (Position::FL, "F U F'"),
    (Position::BR, "B U B'"),
    (Position::BL, "L U L'"),
];

/// Algorithms that move only the front right pair and the top layer.
const PAIR_GENERATORS: [&str; 9] = [
    "U",
    "U'",
    "R U R'",
    "R U' R'",
    "R U2 R'",
    "F' U F",
    "F' U' F",
    "F' U2 F",
    "U2",
];

/// Algorithms that move only the top layer, named by what they are known as.
const OLL_GENERATORS: [(&str, &str); 6] = [
    ("U", "U"),
    ("U'", "U'"),
    ("Sune", "R U R' U R U2 R'"),
    ("Antisune", "R U2 R' U' R U' R'"),
    ("FRURUF", "F R U R' U' F'"),
    ("FURURF", "F U R U' R' F'"),
];

/// Algorithms that permute the top layer without disturbing its orientation.
const PLL_GENERATORS: [(&str, &str); 11] = [
    ("U", "U"),
    ("U'", "U'"),
    ("T", "R U R' U' R' F R2 U' R' U' R U R' F'"),
    ("Ua", "R U' R U R U R U' R' U' R2"),
    ("Ub", "R2 U R U R' U' R' U' R' U R'"),
    ("Aa", "x R' U R' D2 R U' R' D2 R2 x'"),
    ("Ab", "x R2 D2 R U R' D2 R U' R x'"),
    ("Ja", "L' U' L F L' U' L U L F' L2 U L"),
    ("Jb", "R U R' F' R U R' U' R' F R2 U' R'"),
    ("Y", "F R U' R' U' R U R' F' R U R' U' R' F R F'"),
    ("H", "M2 U M2 U2 M2 U M2"),
];

/// The T perm, used when a permutation case is missing from the table.
pub(crate) const T_PERM: &str = "R U R' U' R' F R2 U' R' U' R U R' F'";

/// The state of the front right F2L pair, once its corner is above or in its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct F2lCondition {
    /// `UFR` or `DFR`
    pub corner: Position,
    /// The face showing the corner's down color
    pub white: Face,
    /// Whether the edge's front color is on U (edge in the top layer) or F (edge in its slot)
    pub aligned: bool,
}

impl fmt::Display for F2lCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.corner, self.white, self.aligned)
    }
}

impl FromStr for F2lCondition {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let (Some(corner), Some(white), Some(aligned), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(KeyError::Condition(s.to_owned()));
        };

        let corner: Position = corner.parse()?;
        if !matches!(corner, Position::UFR | Position::DFR) {
            return Err(KeyError::Corner(corner));
        }
        let white = white
            .chars()
            .next()
            .filter(|_| white.len() == 1)
            .and_then(Face::from_char)
            .filter(|f| corner.touches(*f))
            .ok_or_else(|| KeyError::Face {
                face: white.to_owned(),
                corner,
            })?;
        let aligned = aligned
            .parse()
            .map_err(|_| KeyError::Aligned(aligned.to_owned()))?;
        Ok(F2lCondition {
            corner,
            white,
            aligned,
        })
    }
}

/// Which F2L case the front right pair is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct F2lKey {
    /// Where the edge is: a top layer edge or `FR`
    pub edge: Position,
    /// Where and how the corner is
    pub condition: F2lCondition,
}

const PAIR_EDGE_SLOTS: [Position; 5] = [
    Position::UF,
    Position::UR,
    Position::UB,
    Position::UL,
    Position::FR,
];

impl F2lKey {
    /// Read the case of the pair belonging between the front and right centers. `None` when the
    /// corner isn't at `UFR` or `DFR` or the edge isn't in the top layer or at `FR`.
    pub fn read(cube: &Cube) -> Option<F2lKey> {
        let down = cube.center(Face::D);
        let front = cube.center(Face::F);
        let right = cube.center(Face::R);
        let corner = cube.find(&[down, front, right])?;
        let edge = cube.find(&[front, right])?;

        if !matches!(corner.position(), Position::UFR | Position::DFR) {
            return None;
        }
        let aligned = match edge.position() {
            Position::FR => edge.sticker(Face::F) == Some(front),
            p if PAIR_EDGE_SLOTS.contains(&p) => edge.sticker(Face::U) == Some(front),
            _ => return None,
        };
        Some(F2lKey {
            edge: edge.position(),
            condition: F2lCondition {
                corner: corner.position(),
                white: corner.face_with(down)?,
                aligned,
            },
        })
    }
}

/// An OLL case: the sticker string with everything but the up color masked.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OllKey(String);

impl OllKey {
    /// Read the case of a cube held the solving way up.
    pub fn read(cube: &Cube) -> OllKey {
        OllKey(cube.to_masked_pattern(&[cube.center(Face::U)]))
    }

    /// The pattern.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for OllKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        check_length(s, 54)?;
        if let Some(c) = s
            .chars()
            .find(|&c| c != WILDCARD && Color::from_char(c).is_none())
        {
            return Err(KeyError::Character(c));
        }
        Ok(OllKey(s.to_owned()))
    }
}

/// A PLL case: the top row of the front, right, back and left faces, each sticker written as the
/// face whose center has its color.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PllKey(String);

const SIDES: [Face; 4] = [Face::F, Face::R, Face::B, Face::L];

impl PllKey {
    /// Read the case of a cube held the solving way up. `None` if some sticker matches no center.
    pub fn read(cube: &Cube) -> Option<PllKey> {
        let mut key = String::with_capacity(12);
        for face in SIDES {
            for i in 0..3 {
                key.push(cube.face_of(cube.get_sticker(face, i))?.as_char());
            }
        }
        Some(PllKey(key))
    }

    /// The key's letters.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PllKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        check_length(s, 12)?;
        if let Some(c) = s.chars().find(|&c| Face::from_char(c).is_none()) {
            return Err(KeyError::Character(c));
        }
        Ok(PllKey(s.to_owned()))
    }
}

fn check_length(s: &str, expected: usize) -> Result<(), KeyError> {
    match s.chars().count() {
        found if found == expected => Ok(()),
        found => Err(KeyError::Length { found, expected }),
    }
}

// How many top row side stickers match their center.
fn top_row_matches(cube: &Cube) -> usize {
    SIDES
        .into_iter()
        .map(|face| {
            (0..3)
                .filter(|&i| cube.get_sticker(face, i) == cube.center(face))
                .count()
        })
        .sum()
}

/// The first of no turn, U, U2 and U' that leaves the most top row stickers matching their
/// centers.
pub(crate) fn best_auf(cube: &Cube) -> Result<Option<Move>, InvalidMoveError> {
    let mut best = (top_row_matches(cube), None);
    for turn in super::TURNS.into_iter().flatten() {
        let mv = Move::new(Layer::U, turn);
        let mut trial = cube.clone();
        trial.apply(mv)?;
        let matches = top_row_matches(&trial);
        if matches > best.0 {
            best = (matches, Some(mv));
        }
    }
    Ok(best.1)
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TableFile {
    #[serde(default)]
    edges: BTreeMap<String, String>,
    #[serde(default)]
    pairs: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(default)]
    oll: BTreeMap<String, String>,
    #[serde(default)]
    pll: BTreeMap<String, String>,
}

/// Every table the solver reads. Built once, then shared between solvers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTables {
    /// Middle layer slot to the moves that empty it
    pub edges: BTreeMap<Position, MoveSequence<Move>>,
    /// F2L case of the front right pair to the moves that solve it
    pub pairs: BTreeMap<F2lKey, MoveSequence<Move>>,
    /// OLL case to the moves that orient the top layer
    pub oll: BTreeMap<OllKey, MoveSequence<Move>>,
    /// PLL case, after the best top layer turn, to the moves that solve the cube
    pub pll: BTreeMap<PllKey, MoveSequence<Move>>,
}

impl Default for LookupTables {
    /// Only the slot extractions, which the F2L phase can't do without.
    fn default() -> Self {
        let edges = EXTRACTIONS
            .into_iter()
            .filter_map(|(slot, alg)| Some((slot, alg.parse().ok()?)))
            .collect();
        LookupTables {
            edges,
            pairs: BTreeMap::new(),
            oll: BTreeMap::new(),
            pll: BTreeMap::new(),
        }
    }
}

fn sequence(table: &'static str, key: &str, alg: &str) -> Result<MoveSequence<Move>, TableError> {
    alg.parse().map_err(|source| TableError::Sequence {
        table,
        key: key.to_owned(),
        source,
    })
}

fn key<K: FromStr<Err = KeyError>>(table: &'static str, key: &str) -> Result<K, TableError> {
    key.parse().map_err(|source| TableError::Key {
        table,
        key: key.to_owned(),
        source,
    })
}

impl LookupTables {
    /// Parse tables from JSON. Every key and sequence is checked.
    pub fn from_json(json: &str) -> Result<Self, TableError> {
        let file: TableFile = serde_json::from_str(json)?;

        let mut edges = BTreeMap::new();
        for (slot, alg) in &file.edges {
            let position: Position = key("edges", slot)?;
            if position.kind() != crate::cube333::PieceKind::Edge
                || position.touches(Face::U)
                || position.touches(Face::D)
            {
                return Err(TableError::Key {
                    table: "edges",
                    key: slot.clone(),
                    source: KeyError::Slot {
                        position,
                        expected: "a middle layer slot",
                    },
                });
            }
            edges.insert(position, sequence("edges", slot, alg)?);
        }

        let mut pairs = BTreeMap::new();
        for (edge, conditions) in &file.pairs {
            let position: Position = key("pairs", edge)?;
            if !PAIR_EDGE_SLOTS.contains(&position) {
                return Err(TableError::Key {
                    table: "pairs",
                    key: edge.clone(),
                    source: KeyError::Slot {
                        position,
                        expected: "a top layer edge or FR",
                    },
                });
            }
            for (condition, alg) in conditions {
                let f2l_key = F2lKey {
                    edge: position,
                    condition: key("pairs", condition)?,
                };
                pairs.insert(f2l_key, sequence("pairs", condition, alg)?);
            }
        }

        let mut oll = BTreeMap::new();
        for (pattern, alg) in &file.oll {
            oll.insert(key("oll", pattern)?, sequence("oll", pattern, alg)?);
        }

        let mut pll = BTreeMap::new();
        for (case, alg) in &file.pll {
            pll.insert(key("pll", case)?, sequence("pll", case, alg)?);
        }

        log::debug!(
            "loaded {} edge, {} pair, {} OLL and {} PLL entries",
            edges.len(),
            pairs.len(),
            oll.len(),
            pll.len()
        );
        Ok(LookupTables {
            edges,
            pairs,
            oll,
            pll,
        })
    }

    /// Write the tables as JSON.
    pub fn to_json(&self) -> Result<String, TableError> {
        let mut file = TableFile::default();
        for (slot, mvs) in &self.edges {
            file.edges.insert(slot.to_string(), mvs.to_string());
        }
        for (f2l_key, mvs) in &self.pairs {
            file.pairs
                .entry(f2l_key.edge.to_string())
                .or_default()
                .insert(f2l_key.condition.to_string(), mvs.to_string());
        }
        for (oll_key, mvs) in &self.oll {
            file.oll.insert(oll_key.0.clone(), mvs.to_string());
        }
        for (pll_key, mvs) in &self.pll {
            file.pll.insert(pll_key.0.clone(), mvs.to_string());
        }
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Read tables from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Write tables to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TableError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Derive every table by searching from a solved cube.
    pub fn discover() -> Result<Self, TableError> {
        Self::discover_with(&CancelToken::new())
    }

    /// [`discover`](Self::discover), stopping early if `cancel` is set.
    pub fn discover_with(cancel: &CancelToken) -> Result<Self, TableError> {
        let mut start = Cube::new();
        orient_cube(&mut start);

        let tables = LookupTables {
            pairs: discover_pairs(&start, cancel)?,
            oll: discover_oll(&start, cancel)?,
            pll: discover_pll(&start, cancel)?,
            ..LookupTables::default()
        };
        log::info!(
            "derived {} pair, {} OLL and {} PLL cases",
            tables.pairs.len(),
            tables.oll.len(),
            tables.pll.len()
        );
        Ok(tables)
    }
}

fn generators<'a>(
    table: &str,
    start: &Cube,
    algs: impl IntoIterator<Item = (&'a str, &'a str)>,
    keeps: impl Fn(&Cube) -> bool,
) -> Result<Vec<Generator>, TableError> {
    let mut kept = Vec::new();
    for (name, alg) in algs {
        let generator = Generator::from_alg(name, alg).map_err(|source| TableError::Sequence {
            table: "generators",
            key: name.to_owned(),
            source,
        })?;
        let mut cube = start.clone();
        let valid = cube.apply_sequence(&generator.moves).is_ok()
            && Face::ALL
                .into_iter()
                .all(|f| cube.center(f) == start.center(f))
            && keeps(&cube);
        if valid {
            kept.push(generator);
        } else {
            log::warn!("dropping {table} generator {name} ({alg}): it disturbs solved pieces");
        }
    }
    Ok(kept)
}

fn search(
    start: &Cube,
    generators: Vec<Generator>,
    pattern: impl Fn(&Cube) -> String,
    cancel: &CancelToken,
) -> Result<DiscoveryOutcome, TableError> {
    let config = DiscoveryConfig {
        generators,
        max_depth: 24,
        ..Default::default()
    };
    Ok(discover(start, &config, pattern, cancel)?)
}

fn insert_shortest<K: Ord>(
    table: &mut BTreeMap<K, MoveSequence<Move>>,
    key: K,
    solution: MoveSequence<Move>,
) {
    match table.entry(key) {
        Entry::Vacant(e) => {
            e.insert(solution);
        }
        Entry::Occupied(mut e) => {
            if solution.len() < e.get().len() {
                e.insert(solution);
            }
        }
    }
}

fn replay(start: &Cube, mvs: &MoveSequence<Move>) -> Result<Cube, TableError> {
    let mut cube = start.clone();
    cube.apply_sequence(mvs).map_err(SearchError::from)?;
    Ok(cube)
}

fn discover_pairs(
    start: &Cube,
    cancel: &CancelToken,
) -> Result<BTreeMap<F2lKey, MoveSequence<Move>>, TableError> {
    let corner = *start.cubie_at(Position::DFR);
    let edge = *start.cubie_at(Position::FR);
    let elsewhere = |c: &Cube| {
        Position::ALL
            .into_iter()
            .filter(|&p| !p.touches(Face::U) && p != Position::DFR && p != Position::FR)
            .all(|p| c.cubie_at(p) == start.cubie_at(p))
    };
    let algs = PAIR_GENERATORS.into_iter().map(|alg| (alg, alg));
    let generators = generators("pairs", start, algs, elsewhere)?;

    let outcome = search(
        start,
        generators,
        |c| c.to_piece_pattern(|p| p.same_piece(&corner) || p.same_piece(&edge)),
        cancel,
    )?;

    let mut pairs = BTreeMap::new();
    for visit in outcome.memo.values() {
        let mvs = outcome.sequence(visit);
        let cube = replay(start, &mvs)?;
        if let Some(f2l_key) = F2lKey::read(&cube) {
            insert_shortest(&mut pairs, f2l_key, mvs.inverse().cancel());
        }
    }
    Ok(pairs)
}

fn discover_oll(
    start: &Cube,
    cancel: &CancelToken,
) -> Result<BTreeMap<OllKey, MoveSequence<Move>>, TableError> {
    let generators = generators("oll", start, OLL_GENERATORS, is_f2l_solved)?;
    let outcome = search(start, generators, |c| OllKey::read(c).0, cancel)?;

    let mut oll = BTreeMap::new();
    for visit in outcome.memo.values() {
        let mvs = outcome.sequence(visit);
        let cube = replay(start, &mvs)?;
        insert_shortest(&mut oll, OllKey::read(&cube), mvs.inverse().cancel());
    }
    Ok(oll)
}

fn discover_pll(
    start: &Cube,
    cancel: &CancelToken,
) -> Result<BTreeMap<PllKey, MoveSequence<Move>>, TableError> {
    let generators = generators("pll", start, PLL_GENERATORS, is_oll_solved)?;
    let outcome = search(start, generators, Cube::to_sticker_string, cancel)?;

    let mut pll = BTreeMap::new();
    for visit in outcome.memo.values() {
        let mvs = outcome.sequence(visit);
        let mut cube = replay(start, &mvs)?;
        let auf = best_auf(&cube).map_err(SearchError::from)?;
        let mut solution = Vec::new();
        if let Some(auf) = auf {
            cube.apply(auf).map_err(SearchError::from)?;
            solution.push(auf.inverse());
        }
        let Some(pll_key) = PllKey::read(&cube) else {
            continue;
        };
        solution.extend(mvs.inverse());
        insert_shortest(&mut pll, pll_key, MoveSequence(solution).cancel());
    }
    Ok(pll)
}

#[cfg(test)]
mod tests {
    use super::super::tests::derived_tables;
    use super::*;

    fn held() -> Cube {
        let mut cube = Cube::new();
        orient_cube(&mut cube);
        cube
    }

    #[test]
    fn condition_round_trip() {
        let condition: F2lCondition = "UFR:U:true".parse().unwrap();
        assert_eq!(
            condition,
            F2lCondition {
                corner: Position::UFR,
                white: Face::U,
                aligned: true
            }
        );
        assert_eq!(condition.to_string(), "UFR:U:true");
        assert_eq!(
            "UFL:U:true".parse::<F2lCondition>(),
            Err(KeyError::Corner(Position::UFL))
        );
        assert_eq!(
            "DFR:U:true".parse::<F2lCondition>(),
            Err(KeyError::Face {
                face: "U".to_owned(),
                corner: Position::DFR
            })
        );
        assert_eq!(
            "UFR:U:yes".parse::<F2lCondition>(),
            Err(KeyError::Aligned("yes".to_owned()))
        );
        assert_eq!(
            "UFR:U".parse::<F2lCondition>(),
            Err(KeyError::Condition("UFR:U".to_owned()))
        );
        assert_eq!(
            "UFQ:U:true".parse::<F2lCondition>(),
            Err(KeyError::Position("UFQ".to_owned()))
        );
    }

    #[test]
    fn solved_pair_key() {
        let key = F2lKey::read(&held()).unwrap();
        assert_eq!(key.edge, Position::FR);
        assert_eq!(key.condition.corner, Position::DFR);
        assert_eq!(key.condition.white, Face::D);
        assert!(key.condition.aligned);
    }

    #[test]
    fn pair_key_after_extraction() {
        let mut cube = held();
        cube.sequence("R U R'").unwrap();
        let key = F2lKey::read(&cube);
        // The corner went to UFL.
        assert_eq!(key, None);
        cube.sequence("U'").unwrap();
        let key = F2lKey::read(&cube).unwrap();
        assert_eq!(key.condition.corner, Position::UFR);
    }

    #[test]
    fn extractions_keep_the_cross_and_other_slots() {
        for (slot, alg) in EXTRACTIONS {
            let mut cube = held();
            cube.sequence(alg).unwrap();
            assert!(super::super::is_cross_solved(&cube), "{alg}");
            for other in [Position::FR, Position::FL, Position::BR, Position::BL] {
                let solved = cube.cubie_at(other) == held().cubie_at(other);
                assert_eq!(solved, other != slot, "{alg} at {other}");
            }
        }
    }

    #[test]
    fn keys_validate() {
        assert!("_".repeat(54).parse::<OllKey>().is_ok());
        assert_eq!(
            "_".repeat(53).parse::<OllKey>(),
            Err(KeyError::Length {
                found: 53,
                expected: 54
            })
        );
        assert_eq!(
            format!("{}X", "_".repeat(53)).parse::<OllKey>(),
            Err(KeyError::Character('X'))
        );
        assert!("FFFRRRBBBLLL".parse::<PllKey>().is_ok());
        assert_eq!(
            "FFFRRRBBBLL".parse::<PllKey>(),
            Err(KeyError::Length {
                found: 11,
                expected: 12
            })
        );
        assert_eq!(
            "FFFRRRBBBLLW".parse::<PllKey>(),
            Err(KeyError::Character('W'))
        );
    }

    #[test]
    fn solved_pll_key() {
        assert_eq!(PllKey::read(&held()).unwrap().as_str(), "FFFRRRBBBLLL");
    }

    #[test]
    fn auf_prefers_no_turn_on_ties() {
        let cube = held();
        assert_eq!(best_auf(&cube).unwrap(), None);
        let mut cube = held();
        cube.sequence("U").unwrap();
        assert_eq!(best_auf(&cube).unwrap(), Some(crate::mv!(U, CounterClockwise)));
    }

    #[test]
    fn bad_json_names_the_table() {
        let err = LookupTables::from_json(r#"{"edges": {"UF": "R U R'"}}"#).unwrap_err();
        assert!(matches!(
            err,
            TableError::Key {
                table: "edges",
                source: KeyError::Slot {
                    position: Position::UF,
                    ..
                },
                ..
            }
        ));

        let err = LookupTables::from_json(r#"{"pll": {"FFFRRRBBBLLL": "R Q"}}"#).unwrap_err();
        assert!(matches!(err, TableError::Sequence { table: "pll", .. }));

        let err = LookupTables::from_json(r#"{"pairs": {"UF": {"UFR:X:true": ""}}}"#).unwrap_err();
        assert!(matches!(
            err,
            TableError::Key {
                table: "pairs",
                source: KeyError::Face { .. },
                ..
            }
        ));
        assert_eq!(
            err.to_string(),
            r#"bad key "UFR:X:true" in pairs table: "X" is not a face of UFR"#
        );

        assert!(matches!(
            LookupTables::from_json("[1, 2]"),
            Err(TableError::Json(_))
        ));
    }

    #[test]
    fn derived_tables_cover_every_case() {
        let tables = derived_tables();
        // 2 corner slots, 3 twists, 5 edge slots, 2 flips.
        assert_eq!(tables.pairs.len(), 60);
        // 8 edge orientations times 27 corner orientations.
        assert_eq!(tables.oll.len(), 216);
        assert!(tables.pll.len() >= 288 / 4);
        assert_eq!(tables.edges.len(), 4);
    }

    #[test]
    fn derived_entries_keep_what_is_solved() {
        let tables = derived_tables();
        let start = held();
        for mvs in tables.pairs.values() {
            let mut cube = start.clone();
            cube.apply_sequence(mvs).unwrap();
            for p in Position::ALL {
                if !p.touches(Face::U) && p != Position::DFR && p != Position::FR {
                    assert_eq!(cube.cubie_at(p), start.cubie_at(p), "{mvs} moves {p}");
                }
            }
        }
        for mvs in tables.oll.values() {
            let mut cube = start.clone();
            cube.apply_sequence(mvs).unwrap();
            assert!(is_f2l_solved(&cube), "{mvs}");
        }
        for mvs in tables.pll.values() {
            let mut cube = start.clone();
            cube.apply_sequence(mvs).unwrap();
            assert!(is_oll_solved(&cube), "{mvs}");
        }
    }

    #[test]
    fn pll_entries_solve_their_case() {
        let tables = derived_tables();
        let mut cube = held();
        cube.sequence(T_PERM).unwrap();
        cube.apply(crate::mv!(U)).unwrap();
        if let Some(auf) = best_auf(&cube).unwrap() {
            cube.apply(auf).unwrap();
        }
        let key = PllKey::read(&cube).unwrap();
        let solution = tables.pll.get(&key).unwrap();
        cube.apply_sequence(solution).unwrap();
        assert!(cube.is_solved());
    }

    #[test]
    fn json_round_trip() {
        let tables = derived_tables();
        let json = tables.to_json().unwrap();
        assert_eq!(LookupTables::from_json(&json).unwrap(), *tables);
    }
}
