// Dweve XVAL - Cross-Machine Benchmark Validation
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

//! Markdown export.

use crate::ranking::RoutineRanking;
use crate::report::Report;
use crate::reporters::{format_kcycles, format_ratio, NOT_AVAILABLE};
use crate::savings::{CompilerSavings, Method};
use crate::supercop::ScalarmultTable;

fn table_header(md: &mut String, headings: &[String]) {
    md.push_str(&format!("| {} |\n", headings.join(" | ")));
    md.push_str(&format!(
        "|{}|\n",
        headings.iter().map(|_| "---").collect::<Vec<_>>().join("|")
    ));
}

/// Renders one routine: ratio table, Final row and champions.
pub fn render_ranking(ranking: &RoutineRanking) -> String {
    let mut md = String::new();
    md.push_str(&format!("## {} (`{}`)\n\n", ranking.caption, ranking.symbol));

    let mut headings = vec!["opt on \\ ran on".to_string()];
    headings.extend(ranking.columns.iter().cloned());
    headings.push("G.M.".to_string());
    table_header(&mut md, &headings);

    for row in &ranking.rows {
        let cells: Vec<String> = row.cells.iter().map(|c| format_ratio(*c)).collect();
        md.push_str(&format!(
            "| {} | {} | {} |\n",
            row.origin,
            cells.join(" | "),
            format_ratio(row.geometric_mean)
        ));
    }

    let finals: Vec<String> = ranking.finals.iter().map(|c| format!("**{}**", format_ratio(*c))).collect();
    md.push_str(&format!(
        "| **Final** | {} | **{}** |\n\n",
        finals.join(" | "),
        format_ratio(ranking.final_geometric_mean)
    ));

    if !ranking.champions.is_empty() {
        md.push_str("**Champions**\n\n");
        for (i, champion) in ranking.champions.iter().enumerate() {
            md.push_str(&format!(
                "{}. {} / `{}`: {:.2} cycles ({}/{} machines)\n",
                i + 1,
                champion.origin,
                champion.filename,
                champion.geometric_mean,
                champion.machines_covered,
                champion.per_machine.len()
            ));
        }
        md.push('\n');
    }

    if !ranking.diagnostics.is_empty() {
        for diagnostic in &ranking.diagnostics {
            md.push_str(&format!("> {}\n", diagnostic));
        }
        md.push('\n');
    }
    md
}

/// Renders the compiler savings summary.
pub fn render_savings(savings: &CompilerSavings) -> String {
    let mut md = String::new();
    md.push_str("## Compiler Savings\n\n");

    let mut headings = vec!["Curve".to_string()];
    for method in Method::ALL {
        for mean in &savings.overall {
            headings.push(format!("{} {}", method.label(), mean.compiler));
        }
    }
    table_header(&mut md, &headings);

    for curve in &savings.curves {
        let cells: Vec<String> = curve
            .methods
            .iter()
            .flat_map(|m| m.compilers.iter().map(|c| format_ratio(c.geometric_mean)))
            .collect();
        md.push_str(&format!("| {} | {} |\n", curve.caption, cells.join(" | ")));
    }
    md.push('\n');

    for mean in &savings.overall {
        md.push_str(&format!(
            "- Overall speedup over {}: **{}**\n",
            mean.compiler,
            format_ratio(mean.geometric_mean)
        ));
    }
    if !savings.skipped.is_empty() {
        md.push_str(&format!("- Skipped: {}\n", savings.skipped.join(", ")));
    }
    md
}

/// Renders the SUPERCOP scalar-multiplication tables.
pub fn render_scalarmult(tables: &[ScalarmultTable]) -> String {
    let mut md = String::new();
    md.push_str("# Scalar Multiplication (cycles)\n\n");

    for table in tables {
        md.push_str(&format!("## {}\n\n", table.heading));
        let mut headings = vec!["Implementation".to_string(), "Lang.".to_string()];
        headings.extend(table.columns.iter().cloned());
        headings.push("G.M.".to_string());
        table_header(&mut md, &headings);

        for row in &table.rows {
            let cells: Vec<String> = row
                .cycles
                .iter()
                .zip(&row.ratios)
                .map(|(c, r)| format_kcycles(*c, *r))
                .collect();
            let mean = match (row.geometric_mean, row.mean_ratio) {
                (Some(gm), Some(r)) => format!("{:.0}k ({:.2}x)", gm / 1000.0, r),
                _ => NOT_AVAILABLE.to_string(),
            };
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                row.name,
                row.language,
                cells.join(" | "),
                mean
            ));
        }
        md.push('\n');
    }

    md.push_str("G.M. stands for geometric mean; ots stands for off-the-shelf; ");
    md.push_str("asm means assembly; -v indicates the use of vector instructions; ");
    md.push_str("bin means precompiled.\n");
    md
}

/// Renders the full report.
pub fn render_report(report: &Report) -> String {
    let mut md = String::new();
    md.push_str("# Cross-Machine Validation Report\n\n");
    md.push_str(&format!("**Machines:** {}\n\n", report.machines.join(", ")));
    md.push_str(&format!("**Compilers:** {}\n\n", report.compilers.join(", ")));

    for ranking in &report.rankings {
        md.push_str(&render_ranking(ranking));
    }
    md.push_str(&render_savings(&report.savings));
    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RatioRow;
    use crate::record::Origin;

    #[test]
    fn test_render_ranking_table() {
        let ranking = RoutineRanking {
            symbol: "p256_mul".into(),
            caption: "P-256".into(),
            columns: vec!["M1".into(), "M2".into()],
            rows: vec![RatioRow {
                origin: Origin::CompilerGenerated("GCC".into()),
                cells: vec![Some(1.5), None],
                geometric_mean: Some(1.5),
            }],
            finals: vec![Some(1.5), None],
            final_geometric_mean: Some(1.5),
            champions: vec![],
            diagnostics: vec![],
        };
        let md = render_ranking(&ranking);
        assert!(md.contains("## P-256 (`p256_mul`)"));
        assert!(md.contains("| opt on \\ ran on | M1 | M2 | G.M. |"));
        assert!(md.contains("|---|---|---|---|"));
        assert!(md.contains("| GCC | 1.50 | N/A | 1.50 |"));
        assert!(md.contains("| **Final** | **1.50** | **N/A** | **1.50** |"));
    }
}
