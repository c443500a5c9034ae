// ═══════════════════════════════════════════════════════════════════
// Aggregation Tests — sector rollups, portfolio totals, derived fields
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;

use portfolio_tracker_core::models::holding::Holding;
use portfolio_tracker_core::services::aggregation_service::AggregationService;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// Build a holding with derived fields already consistent, the way the
/// engine leaves them after a commit.
fn holding(id: &str, sector: &str, purchase_price: f64, quantity: f64, current_price: f64) -> Holding {
    let investment = purchase_price * quantity;
    let present_value = current_price * quantity;
    Holding {
        id: id.to_string(),
        name: format!("{id} Corp"),
        symbol: id.to_uppercase(),
        purchase_price,
        quantity,
        exchange: "NSE".to_string(),
        sector: sector.to_string(),
        current_price,
        pe_ratio: 0.0,
        latest_earnings: 0.0,
        purchase_date: d(2025, 1, 15),
        last_updated: None,
        investment,
        present_value,
        gain_loss: present_value - investment,
        portfolio_percentage: 0.0,
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Portfolio totals
// ═══════════════════════════════════════════════════════════════════

mod portfolio_totals {
    use super::*;

    #[test]
    fn sums_across_all_holdings() {
        let holdings = vec![
            holding("a", "Tech", 100.0, 10.0, 120.0),
            holding("b", "Energy", 50.0, 4.0, 45.0),
        ];
        let totals = AggregationService::new().compute_portfolio_totals(&holdings);

        assert_eq!(totals.total_investment, 1200.0);
        assert_eq!(totals.total_present_value, 1380.0);
        assert_eq!(totals.total_gain_loss, 180.0);
        assert_eq!(totals.gain_loss_percentage, 15.0);
    }

    #[test]
    fn gain_loss_identity_holds() {
        let holdings = vec![
            holding("a", "Tech", 123.0, 7.0, 98.5),
            holding("b", "Pharma", 41.25, 16.0, 44.0),
            holding("c", "Tech", 250.0, 2.0, 310.75),
        ];
        let totals = AggregationService::new().compute_portfolio_totals(&holdings);

        assert_eq!(
            totals.total_gain_loss,
            totals.total_present_value - totals.total_investment
        );
    }

    #[test]
    fn empty_holdings_yield_zeroes() {
        let totals = AggregationService::new().compute_portfolio_totals(&[]);

        assert_eq!(totals.total_investment, 0.0);
        assert_eq!(totals.total_present_value, 0.0);
        assert_eq!(totals.total_gain_loss, 0.0);
        assert_eq!(totals.gain_loss_percentage, 0.0);
    }

    #[test]
    fn zero_investment_yields_zero_percentage() {
        // A position the service reported with a zero purchase price still
        // aggregates without dividing by zero.
        let holdings = vec![holding("free", "Tech", 0.0, 5.0, 10.0)];
        let totals = AggregationService::new().compute_portfolio_totals(&holdings);

        assert_eq!(totals.total_investment, 0.0);
        assert_eq!(totals.total_gain_loss, 50.0);
        assert_eq!(totals.gain_loss_percentage, 0.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Sector summaries
// ═══════════════════════════════════════════════════════════════════

mod sector_summaries {
    use super::*;

    #[test]
    fn groups_two_tech_holdings() {
        // Scenario from the dashboard contract: 1000 → 1200 and 500 → 400
        // in the same sector.
        let holdings = vec![
            holding("a", "Tech", 100.0, 10.0, 120.0),
            holding("b", "Tech", 50.0, 10.0, 40.0),
        ];
        let summaries = AggregationService::new().compute_sector_summaries(&holdings);

        assert_eq!(summaries.len(), 1);
        let tech = &summaries[0];
        assert_eq!(tech.sector, "Tech");
        assert_eq!(tech.total_investment, 1500.0);
        assert_eq!(tech.total_present_value, 1600.0);
        assert_eq!(tech.total_gain_loss, 100.0);
        assert!((tech.gain_loss_percentage - 100.0 / 15.0).abs() < 1e-9); // ≈ 6.67
        assert_eq!(tech.holding_count, 2);
    }

    #[test]
    fn first_seen_sector_order_is_preserved() {
        let holdings = vec![
            holding("a", "Tech", 100.0, 1.0, 100.0),
            holding("b", "Energy", 100.0, 1.0, 100.0),
            holding("c", "Tech", 100.0, 1.0, 100.0),
            holding("d", "Pharma", 100.0, 1.0, 100.0),
        ];
        let summaries = AggregationService::new().compute_sector_summaries(&holdings);

        let sectors: Vec<&str> = summaries.iter().map(|s| s.sector.as_str()).collect();
        assert_eq!(sectors, vec!["Tech", "Energy", "Pharma"]);
    }

    #[test]
    fn holdings_keep_relative_order_within_sector() {
        let holdings = vec![
            holding("a", "Tech", 100.0, 1.0, 100.0),
            holding("b", "Energy", 100.0, 1.0, 100.0),
            holding("c", "Tech", 100.0, 1.0, 100.0),
        ];
        let summaries = AggregationService::new().compute_sector_summaries(&holdings);

        let tech_ids: Vec<&str> = summaries[0].holdings.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(tech_ids, vec!["a", "c"]);
    }

    #[test]
    fn summaries_partition_the_holdings() {
        let holdings = vec![
            holding("a", "Tech", 10.0, 1.0, 12.0),
            holding("b", "Energy", 20.0, 2.0, 18.0),
            holding("c", "Tech", 30.0, 3.0, 33.0),
            holding("d", "Pharma", 40.0, 4.0, 44.0),
            holding("e", "Energy", 50.0, 5.0, 55.0),
        ];
        let summaries = AggregationService::new().compute_sector_summaries(&holdings);

        // Every holding appears in exactly one summary, and the union
        // reconstructs the input set.
        let mut seen: Vec<&str> = summaries
            .iter()
            .flat_map(|s| s.holdings.iter().map(|h| h.id.as_str()))
            .collect();
        assert_eq!(seen.len(), holdings.len());
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen, vec!["a", "b", "c", "d", "e"]);

        for summary in &summaries {
            assert_eq!(summary.holding_count, summary.holdings.len());
        }
    }

    #[test]
    fn sector_investments_sum_to_portfolio_total() {
        let service = AggregationService::new();
        let holdings = vec![
            holding("a", "Tech", 100.0, 10.0, 120.0),
            holding("b", "Energy", 50.0, 4.0, 45.0),
            holding("c", "Tech", 25.0, 8.0, 30.0),
            holding("d", "Pharma", 75.0, 2.0, 60.0),
        ];

        let totals = service.compute_portfolio_totals(&holdings);
        let sector_sum: f64 = service
            .compute_sector_summaries(&holdings)
            .iter()
            .map(|s| s.total_investment)
            .sum();

        assert_eq!(sector_sum, totals.total_investment);
    }

    #[test]
    fn zero_investment_sector_yields_zero_percentage() {
        let holdings = vec![holding("free", "Airdrops", 0.0, 100.0, 1.0)];
        let summaries = AggregationService::new().compute_sector_summaries(&holdings);

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].total_investment, 0.0);
        assert_eq!(summaries[0].total_gain_loss, 100.0);
        assert_eq!(summaries[0].gain_loss_percentage, 0.0);
        assert!(summaries[0].gain_loss_percentage.is_finite());
    }

    #[test]
    fn empty_input_yields_no_summaries() {
        let summaries = AggregationService::new().compute_sector_summaries(&[]);
        assert!(summaries.is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Derived field recomputation
// ═══════════════════════════════════════════════════════════════════

mod recompute_derived {
    use super::*;

    #[test]
    fn overwrites_inconsistent_derived_fields() {
        let mut holdings = vec![holding("a", "Tech", 100.0, 10.0, 120.0)];
        // Corrupt what the service sent.
        holdings[0].investment = -1.0;
        holdings[0].present_value = 999_999.0;
        holdings[0].gain_loss = 42.0;

        AggregationService::new().recompute_derived(&mut holdings);

        assert_eq!(holdings[0].investment, 1000.0);
        assert_eq!(holdings[0].present_value, 1200.0);
        assert_eq!(holdings[0].gain_loss, 200.0);
    }

    #[test]
    fn portfolio_percentages_reflect_investment_shares() {
        let mut holdings = vec![
            holding("a", "Tech", 100.0, 10.0, 100.0), // 1000 of 1250
            holding("b", "Energy", 50.0, 5.0, 50.0),  // 250 of 1250
        ];
        AggregationService::new().recompute_derived(&mut holdings);

        assert_eq!(holdings[0].portfolio_percentage, 80.0);
        assert_eq!(holdings[1].portfolio_percentage, 20.0);
    }

    #[test]
    fn zero_total_investment_yields_zero_percentages() {
        let mut holdings = vec![
            holding("a", "Tech", 0.0, 10.0, 100.0),
            holding("b", "Energy", 0.0, 5.0, 50.0),
        ];
        AggregationService::new().recompute_derived(&mut holdings);

        assert_eq!(holdings[0].portfolio_percentage, 0.0);
        assert_eq!(holdings[1].portfolio_percentage, 0.0);
    }

    #[test]
    fn empty_slice_is_a_no_op() {
        let mut holdings: Vec<Holding> = Vec::new();
        AggregationService::new().recompute_derived(&mut holdings);
        assert!(holdings.is_empty());
    }
}
