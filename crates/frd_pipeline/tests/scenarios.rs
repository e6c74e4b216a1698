//! End-to-end scenarios through the pipeline entry points.

use std::fs;

use frd_algo::{RelatedSection, Severity};
use frd_core::input::{AllocationDetail, Art23Employee, EntityType, InputData, SimulatorResults};
use frd_core::keys::{AllocationItem, EmployeeItem, LineItems};
use frd_core::NormativeConstants;
use frd_io::loader;
use frd_pipeline::{engine_identifiers, run, run_from_manifest_path, run_with_ctx, PipelineCtx, PipelineError};

const NORMATIVA: &str = r#"{
    "valori_pro_capite": { "art67_ccnl_2018": 83.2, "art79_ccnl_2022_b": 84.5 },
    "limiti": {
        "incidenza_salario_accessorio": 48,
        "incremento_virtuosi_dl25_2025": 48,
        "incremento_pnrr_dl13_2023": 5
    },
    "riferimenti_normativi": {
        "art23_dlgs75_2017": "Art. 23, comma 2, D.Lgs. 75/2017",
        "principi_gestione_finanziaria": "Principi contabili",
        "art54_ccnl1999": "Art. 54 CCNL 14.9.2000"
    }
}"#;

fn constants() -> NormativeConstants {
    loader::parse_constants_str(NORMATIVA).unwrap()
}

/// A valid Unione dei Comuni with every amount at zero.
fn base() -> InputData {
    let mut input = InputData::default();
    input.annual.reference_year = 2025;
    input.annual.entity_name = Some("Unione dei Comuni della Valle".into());
    input.annual.entity_type = Some(EntityType::UnioneDeiComuni);
    input.annual.has_executives = Some(false);
    input.historical.employee_fund_2016 = Some(0.0);
    input
}

#[test]
fn scenario_a_all_zero_yields_one_info_finding() {
    let out = run(&base(), &constants()).unwrap();
    let r = &out.result;
    assert_eq!((r.total_stable, r.total_variable, r.total_fund), (0.0, 0.0, 0.0));
    for (_, t) in r.sub_funds() {
        assert_eq!(t.total, 0.0);
    }
    assert_eq!(out.findings.len(), 1);
    let f = &out.findings[0];
    assert_eq!(f.id, "limite_art23_c2");
    assert_eq!(f.severity, Severity::Info);
    assert_eq!((f.current_value.as_str(), f.limit.as_str()), ("€ 0,00", "€ 0,00"));
    assert_eq!(f.citation, "Art. 23, comma 2, D.Lgs. 75/2017");
}

#[test]
fn scenario_b_personnel_growth_raises_the_limit() {
    let mut input = base();
    input.annual.entity_type = Some(EntityType::Comune);
    input.historical.employee_fund_2016 = Some(95_000.0);
    input.historical.employee_fund_2018 = Some(50_000.0);
    input.annual.personnel_2018 = (0..5).map(|i| Art23Employee::full_time(format!("m{i}"))).collect();
    input.annual.personnel_current =
        (0..6).map(|i| Art23Employee::full_time(format!("m{i}")).with_payslips(12.0)).collect();
    input.employee_fund = LineItems::new()
        .with(EmployeeItem::UnicoImporto2017, 80_000.0)
        .with(EmployeeItem::RisorseRiassorbite165, 20_000.0);

    let out = run(&input, &constants()).unwrap();
    let r = &out.result;
    assert_eq!(r.employee.stable, 100_000.0);
    assert_eq!(r.adjustment_amount(), 10_000.0);
    assert_eq!(r.adjusted_limit, 95_000.0 + 10_000.0);

    // The staffing increment was not entered: the checker points at it.
    let inc = out.findings.iter().find(|f| f.id == "verifica_incremento_consistenza").unwrap();
    assert_eq!(inc.severity, Severity::Warning);
    assert_eq!(inc.limit, "Calcolato: € 10.000,00");
    assert_eq!(inc.related_section, Some(RelatedSection::EmployeeFund));
}

#[test]
fn scenario_c_distress_disables_gated_items() {
    let mut input = base();
    input.annual.in_bankruptcy = Some(true);
    input.annual.simulator = Some(SimulatorResults { net_fund_increment: Some(25_000.0), ..Default::default() });
    input.employee_fund = LineItems::new()
        .with(EmployeeItem::IncrementoDecretoPa, 20_000.0)
        .with(EmployeeItem::Euro8450, 8_450.0);

    let out = run(&input, &constants()).unwrap();
    assert_eq!(out.result.employee.stable, 8_450.0);

    input.annual.in_bankruptcy = Some(false);
    let out = run(&input, &constants()).unwrap();
    assert_eq!(out.result.employee.stable, 28_450.0);
}

#[test]
fn scenario_d_stable_costs_exceeding_the_fund() {
    let mut input = base();
    input.historical.employee_fund_2016 = Some(10_000.0);
    input.annual.distribution_mode = Some(true);
    input.employee_fund = LineItems::new().with(EmployeeItem::UnicoImporto2017, 10_000.0);
    input.distribution.historical_progressions = Some(7_000.0);
    input.distribution.comparto_allowance = Some(5_000.0);

    let out = run(&input, &constants()).unwrap();
    assert_eq!(out.result.employee.total, 10_000.0);

    let stable = out.findings.iter().find(|f| f.id == "distribuzione_stabile_supera_totale").unwrap();
    assert_eq!(stable.severity, Severity::Error);
    assert_eq!((stable.current_value.as_str(), stable.limit.as_str()), ("€ 12.000,00", "€ 10.000,00"));

    let budget = out.findings.iter().find(|f| f.id == "distribuzione_superamento_budget").unwrap();
    assert_eq!(budget.severity, Severity::Error);
    assert!(budget.message.contains("€ 2.000,00"));
    assert!(out.summary.has_errors());

    // Derived performance rows stay at zero when nothing is left to distribute.
    let d = out.distribution.unwrap();
    assert_eq!(d.allocated(AllocationItem::PerformanceIndividuale), 0.0);
    assert_eq!(d.allocated(AllocationItem::PerformanceOrganizzativa), 0.0);
}

#[test]
fn scenario_e_earmarked_source_overspent() {
    let mut input = base();
    input.annual.distribution_mode = Some(true);
    input.employee_fund = LineItems::new().with(EmployeeItem::RimborsoSpeseNotifica, 500.0);
    input.distribution = input
        .distribution
        .with_allocation(AllocationItem::CompensiMessiNotificatori, AllocationDetail::allocated(700.0));

    let out = run(&input, &constants()).unwrap();
    let f = out
        .findings
        .iter()
        .find(|f| f.id == "corrispondenza_vn_art54_art67c3f_rimborsoSpeseNotifica")
        .unwrap();
    assert_eq!(f.severity, Severity::Error);
    assert!(!f.compliant);
    assert_eq!(f.current_value, "Fonte: € 500,00, Uso: € 700,00");
    assert!(f.message.contains("errata imputazione"));
    assert_eq!(f.citation, "Art. 54 CCNL 14.9.2000");
}

#[test]
fn derived_defaults_feed_the_individual_share_check() {
    let mut input = base();
    input.historical.employee_fund_2016 = Some(100_000.0);
    input.annual.distribution_mode = Some(true);
    input.employee_fund = LineItems::new().with(EmployeeItem::UnicoImporto2017, 100_000.0);
    input.distribution.individual_performance_pct = Some(40.0);

    let out = run(&input, &constants()).unwrap();
    let d = out.distribution.as_ref().unwrap();
    assert_eq!(d.allocated(AllocationItem::PerformanceIndividuale), 40_000.0);
    assert_eq!(d.allocated(AllocationItem::PerformanceOrganizzativa), 60_000.0);
    let share = out
        .findings
        .iter()
        .find(|f| f.id == "verifica_quota_minima_performance_individuale")
        .unwrap();
    assert_eq!(share.severity, Severity::Info);

    // A manual override below the 30% floor is kept and flagged.
    input.distribution = input
        .distribution
        .with_allocation(AllocationItem::PerformanceIndividuale, AllocationDetail::overridden(10_000.0));
    let out = run(&input, &constants()).unwrap();
    let share = out
        .findings
        .iter()
        .find(|f| f.id == "verifica_quota_minima_performance_individuale")
        .unwrap();
    assert_eq!(share.severity, Severity::Error);
}

#[test]
fn validation_errors_block_the_run() {
    let mut input = base();
    input.annual.entity_type = None;
    match run(&input, &constants()) {
        Err(PipelineError::Validate(report)) => {
            assert!(!report.pass);
            assert_eq!(report.issues[0].code, "Entity.TypeMissing");
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn context_and_manifest_runs_agree() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("input.json");
    let normative_path = dir.path().join("normativa.json");
    let mut input = base();
    input.employee_fund = LineItems::new().with(EmployeeItem::Euro8450, 8_450.0);
    fs::write(&input_path, serde_json::to_vec_pretty(&input).unwrap()).unwrap();
    fs::write(&normative_path, NORMATIVA).unwrap();
    let manifest_path = dir.path().join("manifest.json");
    fs::write(&manifest_path, r#"{ "input_path": "input.json", "normative_path": "normativa.json" }"#).unwrap();

    let loaded = loader::load_context(&input_path, &normative_path).unwrap();
    let direct = run_with_ctx(PipelineCtx { loaded, engine_meta: engine_identifiers() }).unwrap();
    let via_manifest = run_from_manifest_path(&manifest_path).unwrap();

    assert_eq!(direct.outputs, via_manifest.outputs);
    assert_eq!(direct.run_record, via_manifest.run_record);
    assert_eq!(direct.outputs.result.employee.stable, 8_450.0);
    assert_eq!(direct.run_record.reference_year, 2025);
}
