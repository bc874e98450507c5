// ═══════════════════════════════════════════════════════════════════
// Model Tests — Holding, Portfolio, PriceSeries, Period, catalog,
// news, report, settings
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;

use econ_dashboard_core::errors::DashboardError;
use econ_dashboard_core::models::catalog::{AssetCatalog, CatalogEntry};
use econ_dashboard_core::models::exchange_rate::{ExchangeRateRow, RateColumn};
use econ_dashboard_core::models::holding::{Holding, Portfolio};
use econ_dashboard_core::models::news::{NewsItem, TaggedNewsItem, TopicMap};
use econ_dashboard_core::models::price::{Period, PricePoint, PriceSeries};
use econ_dashboard_core::models::report::{AnalysisReport, Section, Severity, Statement};
use econ_dashboard_core::models::series::{AlignedColumn, AlignedSeries};
use econ_dashboard_core::models::settings::Settings;
use econ_dashboard_core::models::valuation::{
    FetchOutcome, PortfolioSummary, SkipReason, ValuationRecord, ValuationRun,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn record(ticker: &str, purchase: f64, current: f64, quantity: f64) -> ValuationRecord {
    ValuationRecord {
        ticker: ticker.into(),
        date: d(2023, 1, 2),
        quantity,
        purchase_price: purchase,
        current_price: current,
        valuation: current * quantity,
        invested: purchase * quantity,
        return_pct: (current / purchase - 1.0) * 100.0,
    }
}

// ═══════════════════════════════════════════════════════════════════
// Holding & Portfolio
// ═══════════════════════════════════════════════════════════════════

mod holding {
    use super::*;

    #[test]
    fn ticker_is_trimmed_and_uppercased() {
        let h = Holding::new("  aapl ", d(2023, 1, 1), 5.0);
        assert_eq!(h.ticker, "AAPL");
    }

    #[test]
    fn each_holding_gets_a_fresh_id() {
        let a = Holding::new("AAPL", d(2023, 1, 1), 5.0);
        let b = Holding::new("AAPL", d(2023, 1, 1), 5.0);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn same_lot_ignores_id() {
        let a = Holding::new("AAPL", d(2023, 1, 1), 5.0);
        let b = Holding::new("aapl", d(2023, 1, 1), 5.0);
        assert!(a.same_lot(&b));
    }

    #[test]
    fn same_lot_detects_different_quantity() {
        let a = Holding::new("AAPL", d(2023, 1, 1), 5.0);
        let b = Holding::new("AAPL", d(2023, 1, 1), 6.0);
        assert!(!a.same_lot(&b));
    }

    #[test]
    fn portfolio_tickers_are_distinct_in_first_seen_order() {
        let portfolio = Portfolio::from_holdings(vec![
            Holding::new("MSFT", d(2023, 2, 1), 3.0),
            Holding::new("AAPL", d(2023, 1, 1), 5.0),
            Holding::new("MSFT", d(2023, 3, 1), 1.0),
        ]);
        assert_eq!(portfolio.tickers(), vec!["MSFT", "AAPL"]);
        assert_eq!(portfolio.len(), 3);
    }

    #[test]
    fn empty_portfolio() {
        let portfolio = Portfolio::new();
        assert!(portfolio.is_empty());
        assert!(portfolio.tickers().is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// PriceSeries
// ═══════════════════════════════════════════════════════════════════

mod price_series {
    use super::*;

    fn series() -> PriceSeries {
        PriceSeries::new(
            "AAPL",
            vec![
                PricePoint::new(d(2023, 1, 5), 12.0),
                PricePoint::new(d(2023, 1, 3), 10.0),
                PricePoint::new(d(2023, 1, 4), 11.0),
            ],
        )
    }

    #[test]
    fn new_sorts_by_date() {
        let s = series();
        let dates: Vec<NaiveDate> = s.points.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![d(2023, 1, 3), d(2023, 1, 4), d(2023, 1, 5)]);
    }

    #[test]
    fn duplicate_dates_keep_last_observation() {
        let s = PriceSeries::new(
            "X",
            vec![
                PricePoint::new(d(2023, 1, 3), 10.0),
                PricePoint::new(d(2023, 1, 3), 10.5),
            ],
        );
        assert_eq!(s.len(), 1);
        assert_eq!(s.price_on(d(2023, 1, 3)), Some(10.5));
    }

    #[test]
    fn price_on_exact_date_only() {
        let s = series();
        assert_eq!(s.price_on(d(2023, 1, 4)), Some(11.0));
        assert_eq!(s.price_on(d(2023, 1, 6)), None);
    }

    #[test]
    fn first_on_or_after_skips_to_next_session() {
        let s = series();
        assert_eq!(s.first_on_or_after(d(2023, 1, 1)).map(|p| p.price), Some(10.0));
        assert_eq!(s.first_on_or_after(d(2023, 1, 4)).map(|p| p.price), Some(11.0));
        assert!(s.first_on_or_after(d(2023, 1, 6)).is_none());
    }

    #[test]
    fn scaled_multiplies_every_price() {
        let s = series().scaled("AAPL x2", 2.0);
        assert_eq!(s.label, "AAPL x2");
        let prices: Vec<f64> = s.points.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![20.0, 22.0, 24.0]);
    }

    #[test]
    fn first_and_last() {
        let s = series();
        assert_eq!(s.first().map(|p| p.price), Some(10.0));
        assert_eq!(s.last().map(|p| p.price), Some(12.0));
        assert!(PriceSeries::empty("X").first().is_none());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Period
// ═══════════════════════════════════════════════════════════════════

mod period {
    use super::*;

    #[test]
    fn display_and_parse_agree() {
        for period in Period::ALL {
            let parsed: Period = period.to_string().parse().unwrap();
            assert_eq!(parsed, period);
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("MAX".parse::<Period>().unwrap(), Period::Max);
        assert_eq!(" 30D ".parse::<Period>().unwrap(), Period::Days30);
    }

    #[test]
    fn unknown_period_is_validation_error() {
        let err = "2w".parse::<Period>().unwrap_err();
        assert!(matches!(err, DashboardError::ValidationError(_)));
    }

    #[test]
    fn start_from_subtracts_days() {
        assert_eq!(Period::Days7.start_from(d(2024, 3, 10)), Some(d(2024, 3, 3)));
        assert_eq!(Period::Days365.days(), Some(365));
        assert_eq!(Period::Max.start_from(d(2024, 3, 10)), None);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Valuation models
// ═══════════════════════════════════════════════════════════════════

mod valuation {
    use super::*;

    #[test]
    fn gain_loss_is_valuation_minus_invested() {
        let r = record("AAPL", 100.0, 120.0, 5.0);
        assert_eq!(r.gain_loss(), 100.0);
    }

    #[test]
    fn run_splits_valued_and_skipped() {
        let run = ValuationRun::from_outcomes(vec![
            FetchOutcome::Valued(record("AAPL", 100.0, 120.0, 1.0)),
            FetchOutcome::Skipped {
                ticker: "ZZZ".into(),
                reason: SkipReason::CurrentPriceUnavailable,
            },
            FetchOutcome::Valued(record("MSFT", 50.0, 40.0, 2.0)),
        ]);
        assert_eq!(run.records.len(), 2);
        assert_eq!(run.records[0].ticker, "AAPL");
        assert_eq!(run.records[1].ticker, "MSFT");
        assert_eq!(
            run.skipped,
            vec![("ZZZ".to_string(), SkipReason::CurrentPriceUnavailable)]
        );
        assert!(!run.is_empty());
    }

    #[test]
    fn run_with_only_skips_is_empty() {
        let run = ValuationRun::from_outcomes(vec![FetchOutcome::Skipped {
            ticker: "ZZZ".into(),
            reason: SkipReason::PurchasePriceUnavailable,
        }]);
        assert!(run.is_empty());
    }

    #[test]
    fn outcome_record_accessor() {
        let valued = FetchOutcome::Valued(record("AAPL", 1.0, 2.0, 1.0));
        assert_eq!(valued.record().map(|r| r.ticker.as_str()), Some("AAPL"));
        let skipped = FetchOutcome::Skipped {
            ticker: "AAPL".into(),
            reason: SkipReason::InvalidPrice,
        };
        assert!(skipped.record().is_none());
    }

    #[test]
    fn skip_reason_display() {
        assert_eq!(
            SkipReason::PurchasePriceUnavailable.to_string(),
            "purchase price unavailable"
        );
        assert_eq!(SkipReason::InvalidPrice.to_string(), "invalid price");
    }

    #[test]
    fn net_gain() {
        let summary = PortfolioSummary {
            total_current: 900.0,
            total_invested: 1000.0,
            total_return_pct: -10.0,
            shares: vec![],
        };
        assert_eq!(summary.net_gain(), -100.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Aligned series
// ═══════════════════════════════════════════════════════════════════

mod aligned_series {
    use super::*;

    fn table() -> AlignedSeries {
        AlignedSeries {
            dates: vec![d(2023, 1, 1), d(2023, 1, 2)],
            columns: vec![
                AlignedColumn {
                    label: "A".into(),
                    values: vec![Some(1.0), Some(2.0)],
                },
                AlignedColumn {
                    label: "B".into(),
                    values: vec![None, Some(5.0)],
                },
            ],
        }
    }

    #[test]
    fn row_reads_across_columns() {
        assert_eq!(table().row(0), vec![Some(1.0), None]);
        assert_eq!(table().row(1), vec![Some(2.0), Some(5.0)]);
    }

    #[test]
    fn long_format_skips_empty_cells() {
        let t = table();
        let long = t.to_long();
        assert_eq!(
            long,
            vec![
                (d(2023, 1, 1), "A", 1.0),
                (d(2023, 1, 2), "A", 2.0),
                (d(2023, 1, 2), "B", 5.0),
            ]
        );
    }

    #[test]
    fn column_lookup_by_label() {
        let t = table();
        assert!(t.column("B").is_some());
        assert!(t.column("C").is_none());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Exchange-rate rows
// ═══════════════════════════════════════════════════════════════════

mod exchange_rate {
    use super::*;

    #[test]
    fn column_accessor_and_labels() {
        let row = ExchangeRateRow {
            date: d(2024, 1, 2),
            usd_ccl: Some(1200.0),
            usd_mep: Some(1150.0),
            official: Some(800.0),
            eur: None,
            uyu: Some(20.0),
            gap_pct: None,
        };
        assert_eq!(row.get(RateColumn::UsdCcl), Some(1200.0));
        assert_eq!(row.get(RateColumn::Eur), None);
        let labels: Vec<String> = RateColumn::ALL.iter().map(|c| c.to_string()).collect();
        assert_eq!(labels, vec!["USD CCL", "USD MEP", "OFICIAL", "EUR", "UYU"]);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Asset catalog
// ═══════════════════════════════════════════════════════════════════

mod catalog {
    use super::*;

    fn catalog() -> AssetCatalog {
        AssetCatalog::new(vec![
            CatalogEntry::new("msft", "Microsoft"),
            CatalogEntry::new("AAPL", "Apple Inc."),
            CatalogEntry::new("BTC-USD", "Bitcoin"),
        ])
    }

    #[test]
    fn entries_sorted_by_name() {
        assert_eq!(
            catalog().labels(),
            vec!["AAPL - Apple Inc.", "BTC-USD - Bitcoin", "MSFT - Microsoft"]
        );
    }

    #[test]
    fn name_lookup_is_case_insensitive() {
        let c = catalog();
        assert_eq!(c.name_of("msft"), Some("Microsoft"));
        assert!(c.contains("btc-usd"));
        assert!(!c.contains("GOOG"));
    }

    #[test]
    fn tickers_sorted_alphabetically() {
        assert_eq!(catalog().tickers_sorted(), vec!["AAPL", "BTC-USD", "MSFT"]);
    }

    #[test]
    fn ticker_from_label() {
        assert_eq!(AssetCatalog::ticker_from_label("AAPL - Apple Inc."), "AAPL");
        assert_eq!(AssetCatalog::ticker_from_label("GC=F"), "GC=F");
    }
}

// ═══════════════════════════════════════════════════════════════════
// News
// ═══════════════════════════════════════════════════════════════════

mod news {
    use super::*;

    #[test]
    fn display_date_formats_parsed_timestamp() {
        let mut item = NewsItem::new("Title", "https://example.com/a");
        item.published =
            chrono::DateTime::parse_from_rfc2822("Tue, 05 Mar 2024 14:30:00 -0300").ok();
        assert_eq!(item.display_date(), "05/03/2024 14:30 hs");
    }

    #[test]
    fn display_date_falls_back_to_raw() {
        let mut item = NewsItem::new("Title", "");
        item.published_raw = "ayer".into();
        assert_eq!(item.display_date(), "ayer");
    }

    #[test]
    fn tagged_item_has_topic() {
        let tagged = TaggedNewsItem {
            item: NewsItem::new("x", ""),
            topics: vec!["Inflación".into(), "Alerta".into()],
        };
        assert!(tagged.has_topic("Alerta"));
        assert!(!tagged.has_topic("General"));
    }

    #[test]
    fn default_topic_map() {
        let map = TopicMap::default();
        assert_eq!(map.default_topic, "General");
        assert_eq!(
            map.topics(),
            vec![
                "Inflación",
                "Tipo de cambio",
                "Commodities",
                "Política monetaria",
                "Alerta"
            ]
        );
    }

    #[test]
    fn topic_map_json_roundtrip() {
        let map = TopicMap::default();
        let json = serde_json::to_string(&map).unwrap();
        let back: TopicMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Report
// ═══════════════════════════════════════════════════════════════════

mod report {
    use super::*;

    fn report() -> AnalysisReport {
        AnalysisReport {
            generated_on: d(2024, 5, 1),
            statements: vec![
                Statement::new(Section::Overview, Severity::Info, "first"),
                Statement::new(Section::Alerts, Severity::Warning, "second"),
                Statement::new(Section::Overview, Severity::Success, "third"),
            ],
        }
    }

    #[test]
    fn section_keeps_report_order() {
        let r = report();
        let overview: Vec<&str> = r
            .section(Section::Overview)
            .iter()
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(overview, vec!["first", "third"]);
        assert!(r.section(Section::News).is_empty());
    }

    #[test]
    fn has_severity() {
        let r = report();
        assert!(r.has_severity(Severity::Warning));
        assert!(!r.has_severity(Severity::Error));
    }

    #[test]
    fn to_text_one_line_per_statement() {
        assert_eq!(report().to_text(), "- first\n- second\n- third\n");
    }

    #[test]
    fn severity_display() {
        assert_eq!(Severity::Success.to_string(), "success");
        assert_eq!(Severity::Error.to_string(), "error");
    }
}

// ═══════════════════════════════════════════════════════════════════
// Settings
// ═══════════════════════════════════════════════════════════════════

mod settings {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.thresholds.concentration_pct, 30.0);
        assert_eq!(s.thresholds.severe_loss_pct, -20.0);
        assert_eq!(s.thresholds.underperformance_pct, 5.0);
        assert_eq!(s.benchmark_return_pct, 15.0);
        assert_eq!(s.ranking_size, 3);
        assert_eq!(s.purchase_lookup_days, 5);
        assert_eq!(s.news.max_items, 20);
        assert_eq!(s.simulation.budget, 150_000.0);
        assert_eq!(s.simulation.sample_size, 5);
        assert_eq!(s.simulation.max_quantity, 10);
        assert_eq!(s.simulation.acquisition_date, d(2023, 1, 1));
    }

    #[test]
    fn empty_json_gives_defaults() {
        let s = Settings::from_json("{}").unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn partial_json_overrides_only_given_fields() {
        let s = Settings::from_json(r#"{"thresholds": {"concentration_pct": 40.0}, "ranking_size": 5}"#)
            .unwrap();
        assert_eq!(s.thresholds.concentration_pct, 40.0);
        assert_eq!(s.thresholds.severe_loss_pct, -20.0);
        assert_eq!(s.ranking_size, 5);
    }

    #[test]
    fn custom_topic_map_from_json() {
        let json = r#"{
            "news": {
                "topics": {
                    "default_topic": "Otros",
                    "rules": [{"topic": "Energía", "keywords": ["petróleo", "gas"]}]
                }
            }
        }"#;
        let s = Settings::from_json(json).unwrap();
        assert_eq!(s.news.topics.default_topic, "Otros");
        assert_eq!(s.news.topics.topics(), vec!["Energía"]);
        assert_eq!(s.news.max_items, 20);
    }

    #[test]
    fn json_roundtrip() {
        let s = Settings::default();
        let back = Settings::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn malformed_json_is_deserialization_error() {
        let err = Settings::from_json("{not json").unwrap_err();
        assert!(matches!(err, DashboardError::Deserialization(_)));
    }

    #[test]
    fn empty_default_topic_rejected() {
        let mut s = Settings::default();
        s.news.topics.default_topic = "  ".into();
        assert!(matches!(s.validate(), Err(DashboardError::Config(_))));
    }

    #[test]
    fn non_finite_threshold_rejected() {
        let mut s = Settings::default();
        s.thresholds.severe_loss_pct = f64::NAN;
        assert!(matches!(s.validate(), Err(DashboardError::Config(_))));
    }

    #[test]
    fn zero_lookup_window_rejected() {
        let mut s = Settings::default();
        s.purchase_lookup_days = 0;
        assert!(matches!(s.validate(), Err(DashboardError::Config(_))));
    }

    #[test]
    fn lookup_window_upper_bound() {
        let mut s = Settings::default();
        s.purchase_lookup_days = 366;
        assert!(s.validate().is_ok());
        s.purchase_lookup_days = 367;
        assert!(matches!(s.validate(), Err(DashboardError::Config(_))));

        let err = Settings::from_json(r#"{"purchase_lookup_days": 9223372036854775807}"#).unwrap_err();
        assert!(matches!(err, DashboardError::Config(_)));
    }

    #[test]
    fn missing_settings_file_is_data_file_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load_from_file(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, DashboardError::DataFile { .. }));
    }

    #[test]
    fn settings_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut s = Settings::default();
        s.benchmark_return_pct = 12.5;
        std::fs::write(&path, s.to_json().unwrap()).unwrap();
        assert_eq!(Settings::load_from_file(&path).unwrap(), s);
    }
}
