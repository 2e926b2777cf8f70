//! Adjacency-matrix CSV codec.
//!
//! The matrix form lists display names along the header row and the first
//! column; each cell holds the relationship type from the row person to the
//! column person. It exists for spreadsheet-style bulk editing:
//!
//! ```text
//! A/B,Bob,Carol
//! Alice,mentor,
//! Bob,X,friend of
//! ```
//!
//! Values are not quoted or escaped, so labels and types containing commas
//! or newlines cannot be represented.

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};

use crate::error::CoreError;
use crate::ident::{canonicalize, relationship_id};
use crate::types::{EdgeTriple, Person};

/// Leading cell of the header row.
pub const CORNER: &str = "A/B";

/// Cell value that never produces an edge (used on the diagonal).
pub const SKIP: &str = "X";

/// One data row: the row label plus its cells in header order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixRow {
    pub label: String,
    pub cells: Vec<String>,
}

/// A directed edge read from a matrix cell, by display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatrixEdge {
    pub source: String,
    pub target: String,
    pub relationship_type: String,
}

/// A matrix edge resolved to node ids, ready to merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedEdge {
    pub start_node_id: String,
    pub end_node_id: String,
    pub relationship_id: String,
    pub relationship_type: String,
}

/// Transient matrix view over a relationship set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjacencyMatrix {
    columns: Vec<String>,
    rows: Vec<MatrixRow>,
}

impl AdjacencyMatrix {
    /// Build the export matrix from edge triples.
    ///
    /// Row labels are the distinct source names and column labels the
    /// distinct target names, each in first-seen order and independent of
    /// one another. A self pair renders as `X`; when several triples share a
    /// pair the last one wins.
    pub fn from_triples(triples: &[EdgeTriple]) -> Self {
        let mut row_labels: IndexSet<&str> = IndexSet::new();
        let mut column_labels: IndexSet<&str> = IndexSet::new();
        let mut types: HashMap<(&str, &str), &str> = HashMap::new();

        for t in triples {
            row_labels.insert(&t.source_name);
            column_labels.insert(&t.target_name);
            types.insert(
                (t.source_name.as_str(), t.target_name.as_str()),
                t.relationship_type.as_str(),
            );
        }

        let rows = row_labels
            .iter()
            .map(|&row| MatrixRow {
                label: row.to_string(),
                cells: column_labels
                    .iter()
                    .map(|&col| {
                        if row == col {
                            SKIP.to_string()
                        } else {
                            types
                                .get(&(row, col))
                                .map(|t| t.to_string())
                                .unwrap_or_default()
                        }
                    })
                    .collect(),
            })
            .collect();

        Self {
            columns: column_labels.into_iter().map(str::to_string).collect(),
            rows,
        }
    }

    /// Parse matrix CSV text.
    ///
    /// The first non-blank line must be the `A/B` header. Every further line
    /// maps its cells positionally onto the header's column labels. Blank
    /// lines are ignored and a trailing `\r` is stripped from each line.
    pub fn parse(text: &str) -> Result<Self, CoreError> {
        let mut lines = text
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .enumerate()
            .map(|(i, l)| (i + 1, l))
            .filter(|(_, l)| !l.trim().is_empty());

        let (header_line, header) = lines.next().ok_or(CoreError::MalformedMatrix {
            line: 1,
            reason: "missing A/B header".to_string(),
        })?;

        let mut header_cells = header.split(',');
        if header_cells.next() != Some(CORNER) {
            return Err(CoreError::MalformedMatrix {
                line: header_line,
                reason: "header must start with A/B".to_string(),
            });
        }
        let columns: Vec<String> = header_cells.map(str::to_string).collect();
        if let Some(pos) = columns.iter().position(|c| c.is_empty()) {
            return Err(CoreError::MalformedMatrix {
                line: header_line,
                reason: format!("column {} has an empty label", pos + 1),
            });
        }

        let mut rows = Vec::new();
        for (line_no, line) in lines {
            let mut fields = line.split(',');
            let label = fields.next().unwrap_or_default();
            if label == CORNER {
                return Err(CoreError::MalformedMatrix {
                    line: line_no,
                    reason: "duplicate A/B header".to_string(),
                });
            }
            if label.is_empty() {
                return Err(CoreError::MalformedMatrix {
                    line: line_no,
                    reason: "empty row label".to_string(),
                });
            }

            let cells: Vec<String> = fields.map(str::to_string).collect();
            if cells.len() > columns.len() {
                return Err(CoreError::MalformedMatrix {
                    line: line_no,
                    reason: format!(
                        "row {label} has {} cells but the header has {} columns",
                        cells.len(),
                        columns.len()
                    ),
                });
            }

            rows.push(MatrixRow {
                label: label.to_string(),
                cells,
            });
        }

        tracing::debug!(columns = columns.len(), rows = rows.len(), "Parsed adjacency matrix");
        Ok(Self { columns, rows })
    }

    /// Column labels in header order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[MatrixRow] {
        &self.rows
    }

    /// Every label that appears as a column or a row, deduplicated,
    /// columns first.
    pub fn labels(&self) -> Vec<&str> {
        let labels: IndexSet<&str> = self
            .columns
            .iter()
            .chain(self.rows.iter().map(|r| &r.label))
            .map(String::as_str)
            .collect();
        labels.into_iter().collect()
    }

    /// Edges encoded by the cells. Empty cells and `X` (anywhere in the
    /// matrix, not only on the diagonal) produce nothing.
    pub fn edges(&self) -> Vec<MatrixEdge> {
        let mut edges = Vec::new();
        for row in &self.rows {
            for (cell, column) in row.cells.iter().zip(&self.columns) {
                if cell.is_empty() || cell == SKIP {
                    continue;
                }
                edges.push(MatrixEdge {
                    source: row.label.clone(),
                    target: column.clone(),
                    relationship_type: cell.clone(),
                });
            }
        }
        edges
    }

    /// Persons to merge, one per distinct canonical id. When two labels
    /// canonicalize to the same id the first label names the person.
    pub fn persons(&self) -> Vec<Person> {
        let mut persons: IndexMap<String, Person> = IndexMap::new();
        for label in self.labels() {
            persons
                .entry(canonicalize(label))
                .or_insert_with(|| Person::from_label(label));
        }
        persons.into_values().collect()
    }

    /// Edges to merge, one per ordered endpoint pair; a later cell for the
    /// same pair overrides an earlier one.
    ///
    /// Distinct pairs may join to the same relationship id (`a_b -> c` and
    /// `a -> b_c`), so the pair itself is the key.
    pub fn keyed_edges(&self) -> Vec<KeyedEdge> {
        let mut keyed: IndexMap<(String, String), KeyedEdge> = IndexMap::new();
        for edge in self.edges() {
            let start_node_id = canonicalize(&edge.source);
            let end_node_id = canonicalize(&edge.target);
            keyed
                .entry((start_node_id.clone(), end_node_id.clone()))
                .and_modify(|k| k.relationship_type = edge.relationship_type.clone())
                .or_insert_with(|| KeyedEdge {
                    relationship_id: relationship_id(&start_node_id, &end_node_id),
                    start_node_id,
                    end_node_id,
                    relationship_type: edge.relationship_type,
                });
        }
        keyed.into_values().collect()
    }

    /// Render as matrix CSV: `\n`-separated, no trailing newline, no quoting.
    pub fn to_csv(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows.len() + 1);

        let mut header = String::from(CORNER);
        for column in &self.columns {
            header.push(',');
            header.push_str(column);
        }
        lines.push(header);

        for row in &self.rows {
            let mut line = row.label.clone();
            for cell in &row.cells {
                line.push(',');
                line.push_str(cell);
            }
            lines.push(line);
        }

        lines.join("\n")
    }
}

/// Export edge triples as matrix CSV.
pub fn render_matrix(triples: &[EdgeTriple]) -> String {
    AdjacencyMatrix::from_triples(triples).to_csv()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn triple(source: &str, rel: &str, target: &str) -> EdgeTriple {
        EdgeTriple {
            source: crate::canonicalize(source),
            source_name: source.to_string(),
            relationship_type: rel.to_string(),
            target: crate::canonicalize(target),
            target_name: target.to_string(),
        }
    }

    fn edge_set(matrix: &AdjacencyMatrix) -> HashSet<(String, String, String)> {
        matrix
            .edges()
            .into_iter()
            .map(|e| (e.source, e.target, e.relationship_type))
            .collect()
    }

    #[test]
    fn export_single_edge() {
        let csv = render_matrix(&[triple("Alice", "mentor", "Bob")]);
        assert_eq!(csv, "A/B,Bob\nAlice,mentor");
    }

    #[test]
    fn export_marks_self_pairs_and_leaves_gaps() {
        let csv = render_matrix(&[
            triple("Alice", "mentor", "Bob"),
            triple("Bob", "friend of", "Carol"),
            triple("Bob", "reports to", "Alice"),
        ]);
        assert_eq!(
            csv,
            "A/B,Bob,Carol,Alice\n\
             Alice,mentor,,X\n\
             Bob,X,friend of,reports to"
        );
    }

    #[test]
    fn export_row_and_column_labels_are_independent() {
        // Carol only receives, Alice only sends.
        let matrix = AdjacencyMatrix::from_triples(&[
            triple("Alice", "mentor", "Bob"),
            triple("Alice", "peer", "Carol"),
        ]);
        assert_eq!(matrix.columns(), ["Bob", "Carol"]);
        assert_eq!(matrix.rows().len(), 1);
        assert_eq!(matrix.rows()[0].label, "Alice");
    }

    #[test]
    fn export_of_nothing_is_just_the_corner() {
        assert_eq!(render_matrix(&[]), "A/B");
    }

    #[test]
    fn export_last_duplicate_pair_wins() {
        let csv = render_matrix(&[
            triple("Alice", "mentor", "Bob"),
            triple("Alice", "manager", "Bob"),
        ]);
        assert_eq!(csv, "A/B,Bob\nAlice,manager");
    }

    #[test]
    fn parse_maps_cells_positionally() {
        let matrix = AdjacencyMatrix::parse("A/B,Bob,Carol\nAlice,mentor,\nBob,X,friend of").unwrap();
        assert_eq!(matrix.columns(), ["Bob", "Carol"]);
        assert_eq!(
            matrix.edges(),
            vec![
                MatrixEdge {
                    source: "Alice".to_string(),
                    target: "Bob".to_string(),
                    relationship_type: "mentor".to_string(),
                },
                MatrixEdge {
                    source: "Bob".to_string(),
                    target: "Carol".to_string(),
                    relationship_type: "friend of".to_string(),
                },
            ]
        );
    }

    #[test]
    fn parse_collects_row_and_column_labels() {
        let matrix = AdjacencyMatrix::parse("A/B,Bob,Carol\nAlice,mentor,\nBob,X,").unwrap();
        assert_eq!(matrix.labels(), vec!["Bob", "Carol", "Alice"]);
    }

    #[test]
    fn x_never_produces_an_edge() {
        let matrix = AdjacencyMatrix::parse("A/B,Alice,Bob\nAlice,X,X\nBob,X,X").unwrap();
        assert!(matrix.edges().is_empty());
    }

    #[test]
    fn parse_tolerates_crlf_and_blank_lines() {
        let matrix = AdjacencyMatrix::parse("A/B,Bob\r\n\r\nAlice,mentor\r\n").unwrap();
        assert_eq!(matrix.rows().len(), 1);
        assert_eq!(matrix.edges()[0].relationship_type, "mentor");
    }

    #[test]
    fn parse_accepts_short_rows() {
        let matrix = AdjacencyMatrix::parse("A/B,Bob,Carol\nAlice,mentor").unwrap();
        assert_eq!(matrix.edges().len(), 1);
    }

    #[test]
    fn parse_rejects_missing_header() {
        let err = AdjacencyMatrix::parse("Alice,mentor").unwrap_err();
        assert!(matches!(err, CoreError::MalformedMatrix { line: 1, .. }));
        assert!(matches!(
            AdjacencyMatrix::parse("\n\n"),
            Err(CoreError::MalformedMatrix { .. })
        ));
    }

    #[test]
    fn parse_rejects_wide_rows() {
        let err = AdjacencyMatrix::parse("A/B,Bob\nAlice,mentor,extra").unwrap_err();
        assert!(matches!(err, CoreError::MalformedMatrix { line: 2, .. }));
    }

    #[test]
    fn parse_rejects_empty_labels() {
        assert!(AdjacencyMatrix::parse("A/B,Bob,\nAlice,mentor").is_err());
        assert!(AdjacencyMatrix::parse("A/B,Bob\n,mentor").is_err());
    }

    #[test]
    fn persons_merge_labels_with_the_same_id() {
        let matrix = AdjacencyMatrix::parse("A/B,Bob,alice\nAlice,mentor,X\nBOB,X,").unwrap();
        let ids: Vec<String> = matrix.persons().into_iter().map(|p| p.node_id).collect();
        assert_eq!(ids, vec!["bob", "alice"]);
    }

    #[test]
    fn keyed_edges_resolve_ids_and_dedupe_pairs() {
        let matrix =
            AdjacencyMatrix::parse("A/B,Bob,Carol\nAlice,mentor,peer\nalice,manager,").unwrap();
        let keyed = matrix.keyed_edges();
        assert_eq!(keyed.len(), 2);
        assert_eq!(keyed[0].relationship_id, "alice_bob");
        assert_eq!(keyed[0].relationship_type, "manager");
        assert_eq!(keyed[1].relationship_id, "alice_carol");
        assert_eq!(keyed[1].start_node_id, "alice");
        assert_eq!(keyed[1].end_node_id, "carol");
    }

    #[test]
    fn keyed_edges_keep_pairs_whose_ids_collide() {
        // "A B" -> "C" and "A" -> "B C" both join to a_b_c.
        let matrix = AdjacencyMatrix::parse("A/B,C,B C\nA B,x,\nA,,y").unwrap();
        let keyed = matrix.keyed_edges();
        assert_eq!(
            keyed,
            vec![
                KeyedEdge {
                    start_node_id: "a_b".to_string(),
                    end_node_id: "c".to_string(),
                    relationship_id: "a_b_c".to_string(),
                    relationship_type: "x".to_string(),
                },
                KeyedEdge {
                    start_node_id: "a".to_string(),
                    end_node_id: "b_c".to_string(),
                    relationship_id: "a_b_c".to_string(),
                    relationship_type: "y".to_string(),
                },
            ]
        );
    }

    /// Fully populated `n x n` matrix with `X` on the diagonal.
    fn square(n: usize) -> String {
        let names: Vec<String> = (0..n).map(|i| format!("Person {i}")).collect();
        let mut csv = format!("{CORNER},{}", names.join(","));
        for (r, row) in names.iter().enumerate() {
            csv.push('\n');
            csv.push_str(row);
            for c in 0..n {
                csv.push(',');
                csv.push_str(if r == c { SKIP } else { "peer" });
            }
        }
        csv
    }

    #[test]
    fn large_matrix_resolves_every_cell() {
        let n = 300;
        let matrix = AdjacencyMatrix::parse(&square(n)).unwrap();

        let persons = matrix.persons();
        assert_eq!(persons.len(), n);
        assert_eq!(persons[0].node_id, "person_0");

        let keyed = matrix.keyed_edges();
        assert_eq!(keyed.len(), n * (n - 1));
        assert_eq!(keyed[0].relationship_id, "person_0_person_1");
        assert_eq!(keyed.last().unwrap().relationship_id, "person_299_person_298");
    }

    #[test]
    fn export_then_parse_preserves_edges() {
        let triples = vec![
            triple("Alice", "mentor", "Bob"),
            triple("Bob", "friend of", "Carol"),
            triple("Carol", "reports to", "Alice"),
            triple("Dave", "peer", "Alice"),
        ];
        let parsed = AdjacencyMatrix::parse(&render_matrix(&triples)).unwrap();

        let expected: HashSet<(String, String, String)> = triples
            .iter()
            .map(|t| {
                (
                    t.source_name.clone(),
                    t.target_name.clone(),
                    t.relationship_type.clone(),
                )
            })
            .collect();
        assert_eq!(edge_set(&parsed), expected);
    }
}
