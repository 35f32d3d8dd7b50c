//! Tabular feature engineering for the diamond-pricing network.
//!
//! Pipeline, in order:
//! 1. mean-impute missing values in the designated numeric columns
//! 2. ordinal-encode the categorical grade columns
//! 3. split off the target, expand the rest with squares, cubes and
//!    pairwise products
//! 4. `log1p` the target
//! 5. shuffle rows once (features and targets jointly)

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::data::categorical::Grade;
use crate::data::dataset::{Dataset, TargetTransform};
use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalColumn {
    pub column: usize,
    pub grade: Grade,
}

/// Fixed column positions of the input CSV. Not auto-detected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabularSchema {
    /// Numeric columns whose missing entries are mean-imputed.
    pub numeric_columns: Vec<usize>,
    pub categorical_columns: Vec<CategoricalColumn>,
    pub target_column: usize,
    /// Cell values that count as missing (compared after trimming).
    pub missing_tokens: Vec<String>,
}

impl Default for TabularSchema {
    /// carat, cut, color, clarity, two numeric measurements, price.
    fn default() -> Self {
        TabularSchema {
            numeric_columns: vec![0, 4, 5, 6],
            categorical_columns: vec![
                CategoricalColumn { column: 1, grade: Grade::Cut },
                CategoricalColumn { column: 2, grade: Grade::Color },
                CategoricalColumn { column: 3, grade: Grade::Clarity },
            ],
            target_column: 6,
            missing_tokens: vec![String::new(), "nan".to_string()],
        }
    }
}

impl TabularSchema {
    /// Checks the column positions against rows of `width` cells.
    pub fn check_width(&self, width: usize) -> Result<()> {
        if self.target_column >= width {
            return Err(Error::MissingColumn {
                row: 1,
                column: self.target_column,
            });
        }
        if let Some(&column) = self.numeric_columns.iter().find(|&&c| c >= width) {
            return Err(Error::InvalidConfig(format!(
                "numeric column {column} is outside rows of width {width}"
            )));
        }
        for cat in &self.categorical_columns {
            if cat.column >= width {
                return Err(Error::InvalidConfig(format!(
                    "categorical column {} is outside rows of width {width}",
                    cat.column
                )));
            }
            if cat.column == self.target_column {
                return Err(Error::InvalidConfig(format!(
                    "target column {} cannot be categorical",
                    cat.column
                )));
            }
        }
        Ok(())
    }
}

pub struct FeatureEngineer {
    schema: TabularSchema,
}

impl FeatureEngineer {
    pub fn new(schema: TabularSchema) -> FeatureEngineer {
        FeatureEngineer { schema }
    }

    /// Reads a CSV file (header row skipped) and engineers it.
    pub fn load_path<P: AsRef<Path>, R: Rng + ?Sized>(&self, path: P, rng: &mut R) -> Result<Dataset> {
        let reader = ReaderBuilder::new().has_headers(true).from_path(path)?;
        self.load(reader, rng)
    }

    /// Same as `load_path` for any byte source.
    pub fn load_reader<Rd: Read, R: Rng + ?Sized>(&self, source: Rd, rng: &mut R) -> Result<Dataset> {
        let reader = ReaderBuilder::new().has_headers(true).from_reader(source);
        self.load(reader, rng)
    }

    fn load<Rd: Read, R: Rng + ?Sized>(&self, mut reader: csv::Reader<Rd>, rng: &mut R) -> Result<Dataset> {
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
        }
        self.engineer(&rows, rng)
    }

    /// Turns raw string rows into an engineered, shuffled dataset whose
    /// targets carry `TargetTransform::Log1p`.
    pub fn engineer<R: Rng + ?Sized>(&self, rows: &[Vec<String>], rng: &mut R) -> Result<Dataset> {
        if rows.is_empty() {
            return Err(Error::EmptyDataset);
        }
        let width = rows[0].len();
        self.schema.check_width(width)?;

        let table = self.numeric_table(rows, width)?;

        let mut base = Vec::with_capacity(table.len());
        let mut targets = Vec::with_capacity(table.len());
        for row in &table {
            let mut features = row.clone();
            let price = features.remove(self.schema.target_column);
            base.push(features);
            targets.push(TargetTransform::Log1p.apply(price));
        }

        let expanded = expand_features(&Matrix::from_data(base));
        debug!(rows = rows.len(), features = expanded.cols, "engineered tabular dataset");

        let dataset = Dataset::new(expanded, targets)?.with_target_transform(TargetTransform::Log1p);
        Ok(dataset.shuffled(rng))
    }

    /// Parses every cell to f64: grades through their ordinal tables,
    /// everything else as a number, with mean imputation for missing
    /// entries in the designated numeric columns.
    fn numeric_table(&self, rows: &[Vec<String>], width: usize) -> Result<Vec<Vec<f64>>> {
        let imputed: HashSet<usize> = self.schema.numeric_columns.iter().copied().collect();
        let mut cells: Vec<Vec<Option<f64>>> = Vec::with_capacity(rows.len());

        for (r, row) in rows.iter().enumerate() {
            let mut parsed = Vec::with_capacity(width);
            for column in 0..width {
                let raw = row
                    .get(column)
                    .ok_or(Error::MissingColumn { row: r + 1, column })?;
                let value = if let Some(cat) = self.categorical(column) {
                    Some(cat.grade.table().code(raw))
                } else if imputed.contains(&column) && self.is_missing(raw) {
                    None
                } else {
                    Some(raw.trim().parse::<f64>().map_err(|_| Error::ParseNumber {
                        row: r + 1,
                        column,
                        value: raw.clone(),
                    })?)
                };
                parsed.push(value);
            }
            cells.push(parsed);
        }

        let mut means = vec![0.0; width];
        for &column in &imputed {
            let present: Vec<f64> = cells.iter().filter_map(|row| row[column]).collect();
            if present.is_empty() {
                return Err(Error::NoValues { column });
            }
            if present.len() < cells.len() {
                warn!(
                    column,
                    missing = cells.len() - present.len(),
                    "imputing missing values with the column mean"
                );
            }
            means[column] = present.iter().sum::<f64>() / present.len() as f64;
        }

        Ok(cells
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .enumerate()
                    .map(|(column, v)| v.unwrap_or(means[column]))
                    .collect()
            })
            .collect())
    }

    fn categorical(&self, column: usize) -> Option<&CategoricalColumn> {
        self.schema.categorical_columns.iter().find(|c| c.column == column)
    }

    fn is_missing(&self, raw: &str) -> bool {
        let raw = raw.trim();
        self.schema.missing_tokens.iter().any(|t| t == raw)
    }
}

/// `[F, F², F³, F[:,i]·F[:,j] for i < j]`.
pub fn expand_features(base: &Matrix) -> Matrix {
    let f = base.cols;
    let squared = base.map(|x| x * x);
    let cubed = base.map(|x| x * x * x);

    let pairs = Matrix {
        rows: base.rows,
        cols: f * f.saturating_sub(1) / 2,
        data: base
            .data
            .iter()
            .map(|row| {
                let mut products = Vec::with_capacity(f * f.saturating_sub(1) / 2);
                for i in 0..f {
                    for j in (i + 1)..f {
                        products.push(row[i] * row[j]);
                    }
                }
                products
            })
            .collect(),
    };

    Matrix::hstack(&[base.clone(), squared, cubed, pairs])
}

/// Width of `expand_features` output for `f` base features.
pub fn expanded_width(f: usize) -> usize {
    3 * f + f * f.saturating_sub(1) / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::random::seeded;

    const CSV: &str = "\
carat,cut,color,clarity,depth,table,price
0.5,Ideal,E,VS1,61.0,55.0,1000
,Good,J,SI2,62.0,57.0,500
1.5,Premium,D,IF,nan,58.0,8000
";

    #[test]
    fn expansion_layout() {
        let base = Matrix::from_data(vec![vec![2.0, 3.0, 5.0]]);
        let out = expand_features(&base);
        assert_eq!(out.cols, expanded_width(3));
        assert_eq!(
            out.data[0],
            vec![2.0, 3.0, 5.0, 4.0, 9.0, 25.0, 8.0, 27.0, 125.0, 6.0, 10.0, 15.0]
        );
    }

    #[test]
    fn diamond_schema_expands_to_33_columns() {
        assert_eq!(expanded_width(6), 33);
    }

    #[test]
    fn imputes_encodes_and_log_transforms() {
        let mut rng = seeded(0);
        let engineer = FeatureEngineer::new(TabularSchema::default());
        let data = engineer.load_reader(CSV.as_bytes(), &mut rng).unwrap();

        assert_eq!(data.len(), 3);
        assert_eq!(data.n_features(), 33);
        assert_eq!(data.target_transform, TargetTransform::Log1p);

        // Find the "Good" row by its price.
        let prices = data.original_targets();
        let good = prices.iter().position(|p| (p - 500.0).abs() < 1e-6).unwrap();
        let row = &data.features.data[good];
        // carat imputed with mean(0.5, 1.5) = 1.0
        assert!((row[0] - 1.0).abs() < 1e-12);
        // cut Good = 2, color J = 1, clarity SI2 = 2
        assert_eq!(&row[1..4], &[2.0, 1.0, 2.0]);

        let premium = prices.iter().position(|p| (p - 8000.0).abs() < 1e-6).unwrap();
        // depth imputed with mean(61, 62)
        assert!((data.features.data[premium][4] - 61.5).abs() < 1e-12);
    }

    #[test]
    fn unparsable_number_names_the_cell() {
        let mut rng = seeded(0);
        let engineer = FeatureEngineer::new(TabularSchema::default());
        let bad = "h1,h2,h3,h4,h5,h6,h7\n0.3,Fair,G,VS2,sixty,55,400\n";
        let err = engineer.load_reader(bad.as_bytes(), &mut rng).unwrap_err();
        assert!(matches!(err, Error::ParseNumber { row: 1, column: 4, .. }));
    }

    #[test]
    fn column_with_nothing_to_impute_is_an_error() {
        let mut rng = seeded(0);
        let engineer = FeatureEngineer::new(TabularSchema::default());
        let rows = vec![vec!["nan", "Fair", "G", "VS2", "60", "55", "400"]
            .into_iter()
            .map(String::from)
            .collect()];
        assert!(matches!(
            engineer.engineer(&rows, &mut rng),
            Err(Error::NoValues { column: 0 })
        ));
    }

    fn diamond_row(cells: [&str; 7]) -> Vec<String> {
        cells.into_iter().map(String::from).collect()
    }

    #[test]
    fn schema_columns_must_fit_the_rows() {
        let mut rng = seeded(0);
        let rows = vec![diamond_row(["0.3", "Fair", "G", "VS2", "60", "55", "400"])];

        let mut schema = TabularSchema::default();
        schema.numeric_columns.push(9);
        let err = FeatureEngineer::new(schema).engineer(&rows, &mut rng).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));

        let mut schema = TabularSchema::default();
        schema.categorical_columns[0].column = 7;
        let err = FeatureEngineer::new(schema).engineer(&rows, &mut rng).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));

        let schema = TabularSchema {
            target_column: 7,
            ..TabularSchema::default()
        };
        let err = FeatureEngineer::new(schema).engineer(&rows, &mut rng).unwrap_err();
        assert!(matches!(err, Error::MissingColumn { column: 7, .. }));
    }

    #[test]
    fn target_cannot_be_a_categorical_column() {
        let mut rng = seeded(0);
        let rows = vec![diamond_row(["0.3", "Fair", "G", "VS2", "60", "55", "400"])];
        let mut schema = TabularSchema::default();
        schema.categorical_columns[2].column = 6;
        let err = FeatureEngineer::new(schema).engineer(&rows, &mut rng).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
