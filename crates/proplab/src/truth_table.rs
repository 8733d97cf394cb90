use std::fmt;

use log::debug;
use serde::{ser::SerializeMap, ser::SerializeStruct, Deserialize, Serialize, Serializer};

use crate::consts::{DEFAULT_TABLE_VARIABLES, MAX_TABLE_VARIABLES};
use crate::logic::eval::Interpretation;
use crate::logic::transform::collect_vars;
use crate::logic::{LogicNode, SynEq};
use crate::parse::normalize::display_tokens;
use crate::parse::{ParseErr, PropParser};

pub type TruthTableResult<T> = Result<T, TruthTableErr>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TruthTableErr {
    Parse(ParseErr),
    NoVariables,
    TooManyVariables(usize, usize),
}

impl fmt::Display for TruthTableErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TruthTableErr::Parse(e) => write!(f, "{}", e),
            TruthTableErr::NoVariables => {
                write!(f, "The formula contains no variables")
            }
            TruthTableErr::TooManyVariables(found, limit) => write!(
                f,
                "The formula has {} variables, at most {} are supported",
                found, limit
            ),
        }
    }
}

impl std::error::Error for TruthTableErr {}

impl From<ParseErr> for TruthTableErr {
    fn from(e: ParseErr) -> Self {
        TruthTableErr::Parse(e)
    }
}

/// Which parenthesized groups get their own column.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub enum SubformulaMode {
    /// Every group, nested ones included.
    #[serde(rename = "ALL")]
    All,
    /// Only groups not enclosed in another group.
    #[serde(rename = "OUTERMOST")]
    Outermost,
}

impl Default for SubformulaMode {
    fn default() -> Self {
        SubformulaMode::All
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct TruthTableParams {
    pub subformulas: SubformulaMode,
    pub max_variables: usize,
}

impl Default for TruthTableParams {
    fn default() -> Self {
        Self {
            subformulas: SubformulaMode::All,
            max_variables: DEFAULT_TABLE_VARIABLES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Value(bool),
    Error(String),
}

impl Cell {
    pub fn value(&self) -> Option<bool> {
        match self {
            Cell::Value(v) => Some(*v),
            Cell::Error(_) => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Value(true) => write!(f, "1"),
            Cell::Value(false) => write!(f, "0"),
            Cell::Error(_) => write!(f, "Error"),
        }
    }
}

/// A column is identified by its subformula. The header is only used for
/// presentation.
#[derive(Debug, Clone)]
pub struct Column {
    pub header: String,
    pub node: LogicNode,
}

#[derive(Debug, Clone)]
pub struct TruthTable {
    variables: Vec<char>,
    columns: Vec<Column>,
    rows: Vec<Vec<Cell>>,
}

impl TruthTable {
    pub fn variables(&self) -> &[char] {
        &self.variables
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.header.as_str()).collect()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn cell(&self, row: usize, header: &str) -> Option<&Cell> {
        let col = self.columns.iter().position(|c| c.header == header)?;
        self.rows.get(row)?.get(col)
    }

    /// Values of the last column, i.e. of the whole formula.
    pub fn results(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().filter_map(|r| r.last())
    }
}

struct RowRef<'t>(&'t [Column], &'t [Cell]);

impl<'t> Serialize for RowRef<'t> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (col, cell) in self.0.iter().zip(self.1) {
            map.serialize_entry(&col.header, &cell.to_string())?;
        }
        map.end()
    }
}

impl Serialize for TruthTable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let rows: Vec<RowRef> = self
            .rows
            .iter()
            .map(|r| RowRef(&self.columns, r))
            .collect();
        let mut state = serializer.serialize_struct("TruthTable", 2)?;
        state.serialize_field("headers", &self.headers())?;
        state.serialize_field("rows", &rows)?;
        state.end()
    }
}

pub fn generate_table(formula: &str) -> TruthTableResult<TruthTable> {
    generate_table_with(formula, TruthTableParams::default())
}

pub fn generate_table_with(formula: &str, params: TruthTableParams) -> TruthTableResult<TruthTable> {
    let parsed = PropParser::parse(formula)?;
    let variables: Vec<char> = collect_vars(&parsed.root).into_iter().collect();

    if variables.is_empty() {
        return Err(TruthTableErr::NoVariables);
    }
    let limit = params.max_variables.min(MAX_TABLE_VARIABLES);
    if variables.len() > limit {
        return Err(TruthTableErr::TooManyVariables(variables.len(), limit));
    }

    let mut columns: Vec<Column> = variables
        .iter()
        .map(|&v| Column {
            header: v.to_string(),
            node: LogicNode::Var(v),
        })
        .collect();

    let groups = parsed.groups.iter().filter(|g| match params.subformulas {
        SubformulaMode::All => true,
        SubformulaMode::Outermost => g.depth == 0,
    });
    for g in groups {
        if g.node.is_atom() || g.node.syn_eq(&parsed.root) {
            continue;
        }
        if columns.iter().any(|c| c.node.syn_eq(&g.node)) {
            continue;
        }
        columns.push(Column {
            header: g.node.to_string(),
            node: g.node.clone(),
        });
    }

    columns.push(Column {
        header: display_tokens(&parsed.tokens),
        node: parsed.root.clone(),
    });

    let n = variables.len();
    debug!(
        "truth table for '{}': {} variables, {} columns",
        formula,
        n,
        columns.len()
    );

    let rows = (0..1usize << n)
        .map(|row| eval_row(&columns, &assignment(&variables, row)))
        .collect();

    Ok(TruthTable {
        variables,
        columns,
        rows,
    })
}

/// One cell per column. A column that fails to evaluate yields an error
/// cell and leaves the others untouched.
fn eval_row(columns: &[Column], interpretation: &Interpretation) -> Vec<Cell> {
    columns
        .iter()
        .map(|c| match c.node.eval(interpretation) {
            Ok(v) => Cell::Value(v),
            Err(e) => Cell::Error(e.to_string()),
        })
        .collect()
}

/// The first variable is the most significant bit of `row`.
fn assignment(variables: &[char], row: usize) -> Interpretation {
    let n = variables.len();
    variables
        .iter()
        .enumerate()
        .map(|(i, &v)| (v, (row >> (n - 1 - i)) & 1 == 1))
        .collect()
}
