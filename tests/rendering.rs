//! Rendering contract: fourteen independent sections, each tolerant of
//! absence, idempotent under re-binding.

use serde_json::{json, Map, Value};

use mercado::render::html::{bind, MountSet};
use mercado::render::{shape_report, SECTION_MOUNTS};
use mercado::report::AnalysisResult;

/// One representative payload per section key, paired with its mount id.
fn section_samples() -> Vec<(&'static str, &'static str, Value)> {
    vec![
        (
            "avatar_ultra_detalhado",
            "avatarResults",
            json!({
                "perfil_demografico": {"faixa_etaria": "25-40", "renda_mensal": "R$5k+"},
                "perfil_psicografico": {"valores": "liberdade"},
                "dores_viscerais": ["sem tempo"],
                "desejos_secretos": ["reconhecimento"],
                "objecoes_reais": ["preço"]
            }),
        ),
        (
            "drivers_mentais_customizados",
            "driversResults",
            json!([{
                "nome": "Urgência",
                "gatilho_central": "escassez",
                "definicao_visceral": "medo de ficar para trás",
                "roteiro_ativacao": {
                    "pergunta_abertura": "Até quando?",
                    "historia_analogia": "Como o trem que parte...",
                    "comando_acao": "Decida hoje"
                },
                "frases_ancoragem": ["agora ou nunca"]
            }]),
        ),
        ("analise_concorrencia_detalhada", "competitionResults", json!({"lideres": []})),
        ("escopo", "positioningResults", json!({"nicho": "fitness"})),
        ("estrategia_palavras_chave", "keywordsResults", json!({"primarias": []})),
        ("metricas_performance_detalhadas", "metricsResults", json!({"cac": 120})),
        ("plano_acao_detalhado", "actionPlanResults", json!({"fases": []})),
        ("insights_exclusivos", "insightsResults", json!(["nicho em alta", "pouca oferta"])),
        ("provas_visuais_sugeridas", "visualProofsResults", json!([{"nome": "prova"}])),
        ("sistema_anti_objecao", "antiObjectionResults", json!({"objecoes": []})),
        ("pre_pitch_invisivel", "prePitchResults", json!({"fases": []})),
        ("predicoes_futuro_completas", "futureResults", json!({"cenarios": []})),
        (
            "pesquisa_web_massiva",
            "researchResults",
            json!({
                "total_queries": 12,
                "total_resultados": 80,
                "fontes_unicas": 30,
                "conteudo_extraido_chars": 250000,
                "queries_executadas": ["mercado fitness brasil"],
                "resultados_detalhados": [
                    {"title": "Tendências", "url": "https://example.com/t", "source": "example"}
                ]
            }),
        ),
        (
            "metadata",
            "metadataResults",
            json!({
                "processing_time_formatted": "2m 13s",
                "analysis_engine": "ultra_detailed",
                "quality_score": 92.5,
                "real_data_sources": 30,
                "total_content_analyzed": 250000
            }),
        ),
    ]
}

fn report_with(keys: &[usize]) -> AnalysisResult {
    let samples = section_samples();
    let mut map = Map::new();
    for &i in keys {
        let (key, _, value) = &samples[i];
        map.insert(key.to_string(), value.clone());
    }
    serde_json::from_value(Value::Object(map)).unwrap()
}

fn rendered(report: &AnalysisResult) -> MountSet {
    let mut mounts = MountSet::full_page();
    bind(&mut mounts, &shape_report(report));
    mounts
}

#[test]
fn each_section_renders_alone() {
    let samples = section_samples();
    for i in 0..samples.len() {
        let mounts = rendered(&report_with(&[i]));
        for (j, (key, mount, _)) in samples.iter().enumerate() {
            let content = mounts.content(mount).unwrap();
            if i == j {
                assert!(!content.is_empty(), "{} should render its own mount", key);
            } else {
                assert_eq!(content, "", "{} must not touch mount {}", samples[i].0, mount);
            }
        }
    }
}

#[test]
fn all_pairs_of_sections_coexist() {
    let n = section_samples().len();
    for i in 0..n {
        for j in (i + 1)..n {
            let mounts = rendered(&report_with(&[i, j]));
            let populated = SECTION_MOUNTS
                .iter()
                .filter(|m| !mounts.content(m).unwrap().is_empty())
                .count();
            assert_eq!(populated, 2, "pair ({}, {}) should populate two mounts", i, j);
        }
    }
}

#[test]
fn full_report_populates_every_mount() {
    let all: Vec<usize> = (0..section_samples().len()).collect();
    let mounts = rendered(&report_with(&all));
    for mount in SECTION_MOUNTS {
        assert!(
            !mounts.content(mount).unwrap().is_empty(),
            "mount {} should be populated",
            mount
        );
    }
}

#[test]
fn rebinding_the_same_report_is_idempotent() {
    let all: Vec<usize> = (0..section_samples().len()).collect();
    let report = report_with(&all);
    let sections = shape_report(&report);

    let mut mounts = MountSet::full_page();
    bind(&mut mounts, &sections);
    let first = mounts.clone();
    bind(&mut mounts, &sections);
    assert_eq!(first, mounts);
}

#[test]
fn empty_report_touches_nothing() {
    let mounts = rendered(&AnalysisResult::default());
    for mount in SECTION_MOUNTS {
        assert_eq!(mounts.content(mount), Some(""));
    }
}

#[test]
fn driver_cards_carry_script_and_anchors() {
    let samples = section_samples();
    let idx = samples.iter().position(|(k, _, _)| *k == "drivers_mentais_customizados").unwrap();
    let mounts = rendered(&report_with(&[idx]));
    let html = mounts.content("driversResults").unwrap();
    assert!(html.contains("Urgência"));
    assert!(html.contains("Roteiro de Ativação"));
    assert!(html.contains("Frases de Ancoragem"));
    assert!(html.contains("agora ou nunca"));
}
