// Dweve Recon - Data Reconciliation Toolkit
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! CSV import/export and on-disk storage for recons.
//!
//! # Features
//!
//! - **Table import**: CSV → [`recon_core::Table`] with per-column type
//!   inference and check-column tagging ([`CheckDetection`])
//! - **Table export**: any table, including report slices, back to CSV
//! - **Summaries**: `Date, Check, Outcome, Count` files, one per run
//! - **Store**: [`ReconStore`] keeps per-recon summaries, the metadata
//!   registry and saved pipelines on disk
//!
//! # Examples
//!
//! ```
//! use recon_core::{build_recon_report, Bucket};
//! use recon_csv::{from_csv, summary_to_csv};
//!
//! let table = from_csv("Unit,Rent Check\nA1,Match\nA2,12.5\n").unwrap();
//! let report = build_recon_report(&table).unwrap();
//! assert_eq!(report.summary.count("Rent Check", Bucket::Failing), 1);
//!
//! let csv = summary_to_csv(&report.summary).unwrap();
//! assert!(csv.starts_with("Date,Check,Outcome,Count\n"));
//! ```
//!
//! ## Store
//!
//! ```no_run
//! use recon_csv::{ReconStore, StoreConfig};
//!
//! let store = ReconStore::new(StoreConfig::default());
//! for (name, summary) in store.latest_summaries().unwrap() {
//!     println!("{}: {} summary rows", name, summary.map(|s| s.len()).unwrap_or(0));
//! }
//! ```

mod error;
mod from_csv;
mod store;
mod to_csv;

pub use error::{CsvError, Result};
pub use from_csv::{
    from_csv, from_csv_reader, from_csv_with_config, CheckDetection, FromCsvConfig,
    DEFAULT_MAX_ROWS, NULL_MARKERS,
};
pub use store::{
    run_date_from_path, ReconMetadata, ReconStore, StoreConfig, METADATA_COLUMNS,
    RUN_FILE_FORMAT,
};
pub use to_csv::{
    summary_from_csv, summary_from_reader, summary_to_csv, summary_to_writer, to_csv,
    to_csv_with_config, to_csv_writer, to_csv_writer_with_config, ToCsvConfig,
};
