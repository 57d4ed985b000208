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

//! Recon setup wizard state machine.
//!
//! Setting up a recon walks through five states:
//!
//! ```text
//! AwaitingFirstImport --TableImported--> AwaitingSecondImport
//! AwaitingSecondImport --TableImported--> AwaitingMerge
//! AwaitingMerge --TablesMerged--> AwaitingChecks
//! AwaitingChecks --ChecksAdded--> AwaitingChecks
//! AwaitingChecks --ReportGenerated--> ReportGenerated
//! ReportGenerated --ReportGenerated--> ReportGenerated
//! ```

use crate::error::{ReconError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WizardState {
    #[default]
    AwaitingFirstImport,
    AwaitingSecondImport,
    AwaitingMerge,
    AwaitingChecks,
    ReportGenerated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WizardEvent {
    TableImported,
    TablesMerged,
    ChecksAdded,
    ReportGenerated,
}

impl WizardState {
    /// State implied by the number of tables the user has built so far: two
    /// imports and the merged table make three.
    pub fn from_table_count(count: usize) -> Self {
        match count {
            0 => Self::AwaitingFirstImport,
            1 => Self::AwaitingSecondImport,
            2 => Self::AwaitingMerge,
            _ => Self::AwaitingChecks,
        }
    }

    /// Apply an event.
    ///
    /// # Errors
    ///
    /// Returns [`ReconError::InvalidTransition`] if the event is not accepted
    /// in this state.
    ///
    /// ```
    /// use recon_core::{WizardEvent, WizardState};
    ///
    /// let state = WizardState::default()
    ///     .advance(WizardEvent::TableImported).unwrap()
    ///     .advance(WizardEvent::TableImported).unwrap()
    ///     .advance(WizardEvent::TablesMerged).unwrap();
    /// assert_eq!(state, WizardState::AwaitingChecks);
    /// assert!(state.advance(WizardEvent::TableImported).is_err());
    /// ```
    pub fn advance(self, event: WizardEvent) -> Result<Self> {
        use WizardEvent as E;
        use WizardState as S;

        match (self, event) {
            (S::AwaitingFirstImport, E::TableImported) => Ok(S::AwaitingSecondImport),
            (S::AwaitingSecondImport, E::TableImported) => Ok(S::AwaitingMerge),
            (S::AwaitingMerge, E::TablesMerged) => Ok(S::AwaitingChecks),
            (S::AwaitingChecks, E::ChecksAdded) => Ok(S::AwaitingChecks),
            (S::AwaitingChecks, E::ReportGenerated) => Ok(S::ReportGenerated),
            (S::ReportGenerated, E::ReportGenerated) => Ok(S::ReportGenerated),
            (from, event) => Err(ReconError::InvalidTransition {
                from: from.to_string(),
                event: format!("{:?}", event),
            }),
        }
    }

    /// Whether a report can be generated from this state.
    pub fn can_generate_report(&self) -> bool {
        matches!(self, Self::AwaitingChecks | Self::ReportGenerated)
    }

    /// Guidance shown to the user in this state.
    pub fn instruction(&self) -> &'static str {
        match self {
            Self::AwaitingFirstImport => "Import the first data source.",
            Self::AwaitingSecondImport => "Import the second data source.",
            Self::AwaitingMerge => {
                "Merge the two datasets, selecting the key columns to match rows on."
            }
            Self::AwaitingChecks => {
                "Add check columns comparing the merged attributes with compare_numbers \
                 or compare_strings, then generate the report."
            }
            Self::ReportGenerated => "The report has been generated.",
        }
    }
}

impl fmt::Display for WizardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::AwaitingFirstImport => "awaiting first import",
            Self::AwaitingSecondImport => "awaiting second import",
            Self::AwaitingMerge => "awaiting merge",
            Self::AwaitingChecks => "awaiting checks",
            Self::ReportGenerated => "report generated",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_walkthrough() {
        let mut state = WizardState::default();
        for event in [
            WizardEvent::TableImported,
            WizardEvent::TableImported,
            WizardEvent::TablesMerged,
            WizardEvent::ChecksAdded,
            WizardEvent::ChecksAdded,
            WizardEvent::ReportGenerated,
        ] {
            state = state.advance(event).unwrap();
        }
        assert_eq!(state, WizardState::ReportGenerated);
        assert!(state.can_generate_report());
    }

    #[test]
    fn test_rejects_out_of_order_events() {
        let err = WizardState::AwaitingFirstImport
            .advance(WizardEvent::TablesMerged)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid wizard transition: TablesMerged is not accepted while awaiting first import"
        );
        assert!(WizardState::AwaitingMerge
            .advance(WizardEvent::ReportGenerated)
            .is_err());
    }

    #[test]
    fn test_from_table_count() {
        assert_eq!(WizardState::from_table_count(0), WizardState::AwaitingFirstImport);
        assert_eq!(WizardState::from_table_count(2), WizardState::AwaitingMerge);
        assert_eq!(WizardState::from_table_count(5), WizardState::AwaitingChecks);
        assert!(!WizardState::from_table_count(1).can_generate_report());
    }

    #[test]
    fn test_instructions_are_distinct() {
        let states = [
            WizardState::AwaitingFirstImport,
            WizardState::AwaitingSecondImport,
            WizardState::AwaitingMerge,
            WizardState::AwaitingChecks,
            WizardState::ReportGenerated,
        ];
        for (i, a) in states.iter().enumerate() {
            for b in &states[i + 1..] {
                assert_ne!(a.instruction(), b.instruction());
            }
        }
    }
}
