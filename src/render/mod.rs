//! Report rendering, split in two stages: a pure shaping step that decides
//! which sections are present and normalizes their fields, and an HTML
//! binding step (`html`) that writes each shaped section into its named
//! mount point. Shaping is stateless: the same report always produces the
//! same sections.

use crate::report::{ActivationScript, AnalysisResult, ResearchSource};

pub mod html;

/// Mount ids for the fourteen known sections, in render order.
pub const SECTION_MOUNTS: [&str; 14] = [
    "avatarResults",
    "driversResults",
    "competitionResults",
    "positioningResults",
    "keywordsResults",
    "metricsResults",
    "actionPlanResults",
    "insightsResults",
    "visualProofsResults",
    "antiObjectionResults",
    "prePitchResults",
    "futureResults",
    "researchResults",
    "metadataResults",
];

const MAX_QUERIES_SHOWN: usize = 10;
const MAX_SOURCES_SHOWN: usize = 15;

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Mount id this section binds to.
    pub mount: &'static str,
    pub title: String,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Key→value card; labels already humanized.
    Card { title: String, items: Vec<(String, String)> },
    /// Labeled bullet list of free text.
    List { title: String, items: Vec<String> },
    /// One mental-driver card.
    Driver {
        name: String,
        trigger: String,
        definition: String,
        script: Option<ActivationScript>,
        anchors: Vec<String>,
    },
    /// Numbered showcase (insights).
    Numbered(Vec<String>),
    /// Label/value counter grid (research stats, metadata).
    Counters(Vec<(String, String)>),
    /// Source list (title, url, source name).
    Sources(Vec<ResearchSource>),
    /// Placeholder body for sections rendered only as a summary.
    Paragraph(String),
}

/// Underscored backend keys become human-readable labels.
pub fn humanize(key: &str) -> String {
    key.replace('_', " ")
}

/// Decide which of the fourteen sections are present and shape their
/// content. Absent sections simply do not appear; that is never an error.
pub fn shape_report(report: &AnalysisResult) -> Vec<Section> {
    let mut sections = Vec::new();

    if let Some(avatar) = &report.avatar_ultra_detalhado {
        let mut blocks = Vec::new();
        if let Some(profile) = &avatar.perfil_demografico {
            blocks.push(Block::Card {
                title: "Perfil Demográfico".to_string(),
                items: profile.iter().map(|(k, v)| (humanize(k), v.clone())).collect(),
            });
        }
        if let Some(profile) = &avatar.perfil_psicografico {
            blocks.push(Block::Card {
                title: "Perfil Psicográfico".to_string(),
                items: profile.iter().map(|(k, v)| (humanize(k), v.clone())).collect(),
            });
        }
        for (title, items) in [
            ("Dores Viscerais", &avatar.dores_viscerais),
            ("Desejos Secretos", &avatar.desejos_secretos),
            ("Objeções Reais", &avatar.objecoes_reais),
        ] {
            if let Some(items) = items {
                blocks.push(Block::List { title: title.to_string(), items: items.clone() });
            }
        }
        sections.push(Section {
            mount: "avatarResults",
            title: "Avatar Ultra-Detalhado".to_string(),
            blocks,
        });
    }

    if let Some(drivers) = &report.drivers_mentais_customizados {
        let blocks = drivers
            .iter()
            .map(|d| Block::Driver {
                name: d.nome.clone(),
                trigger: d.gatilho_central.clone(),
                definition: d.definicao_visceral.clone(),
                script: d.roteiro_ativacao.clone(),
                anchors: d.frases_ancoragem.clone().unwrap_or_default(),
            })
            .collect();
        sections.push(Section {
            mount: "driversResults",
            title: "Drivers Mentais Customizados".to_string(),
            blocks,
        });
    }

    let summaries: [(&'static str, &str, &Option<serde_json::Value>, &str); 8] = [
        (
            "competitionResults",
            "Análise de Concorrência",
            &report.analise_concorrencia_detalhada,
            "Análise detalhada da concorrência disponível nos dados completos.",
        ),
        (
            "positioningResults",
            "Posicionamento e Escopo",
            &report.escopo,
            "Estratégia de posicionamento detalhada disponível nos dados completos.",
        ),
        (
            "keywordsResults",
            "Estratégia de Palavras-Chave",
            &report.estrategia_palavras_chave,
            "Estratégia completa de palavras-chave disponível nos dados completos.",
        ),
        (
            "metricsResults",
            "Métricas de Performance",
            &report.metricas_performance_detalhadas,
            "Métricas detalhadas de performance disponíveis nos dados completos.",
        ),
        (
            "actionPlanResults",
            "Plano de Ação Detalhado",
            &report.plano_acao_detalhado,
            "Plano de ação completo disponível nos dados completos.",
        ),
        (
            "visualProofsResults",
            "Provas Visuais Instantâneas",
            &report.provas_visuais_sugeridas,
            "Sistema completo de provas visuais disponível nos dados completos.",
        ),
        (
            "antiObjectionResults",
            "Sistema Anti-Objeção",
            &report.sistema_anti_objecao,
            "Sistema completo anti-objeção disponível nos dados completos.",
        ),
        (
            "prePitchResults",
            "Pré-Pitch Invisível",
            &report.pre_pitch_invisivel,
            "Sistema completo de pré-pitch disponível nos dados completos.",
        ),
    ];
    for (mount, title, value, summary) in summaries {
        if value.is_some() {
            sections.push(Section {
                mount,
                title: title.to_string(),
                blocks: vec![Block::Paragraph(summary.to_string())],
            });
        }
    }

    if let Some(insights) = &report.insights_exclusivos {
        sections.push(Section {
            mount: "insightsResults",
            title: "Insights Exclusivos Ultra-Valiosos".to_string(),
            blocks: vec![Block::Numbered(insights.clone())],
        });
    }

    if report.predicoes_futuro_completas.is_some() {
        sections.push(Section {
            mount: "futureResults",
            title: "Predições do Futuro".to_string(),
            blocks: vec![Block::Paragraph(
                "Predições completas do futuro do mercado disponíveis nos dados completos."
                    .to_string(),
            )],
        });
    }

    if let Some(research) = &report.pesquisa_web_massiva {
        let mut blocks = vec![Block::Counters(vec![
            ("Queries Executadas".to_string(), research.total_queries.to_string()),
            ("Resultados Encontrados".to_string(), research.total_resultados.to_string()),
            ("Fontes Únicas".to_string(), research.fontes_unicas.to_string()),
            (
                "Conteúdo Extraído".to_string(),
                format!("{} chars", research.conteudo_extraido_chars),
            ),
        ])];
        if let Some(queries) = &research.queries_executadas {
            blocks.push(Block::List {
                title: "Queries Executadas".to_string(),
                items: queries.iter().take(MAX_QUERIES_SHOWN).cloned().collect(),
            });
        }
        if let Some(sources) = &research.resultados_detalhados {
            blocks.push(Block::Sources(
                sources.iter().take(MAX_SOURCES_SHOWN).cloned().collect(),
            ));
        }
        sections.push(Section {
            mount: "researchResults",
            title: "Pesquisa Web Massiva REAL".to_string(),
            blocks,
        });
    }

    if let Some(meta) = &report.metadata {
        sections.push(Section {
            mount: "metadataResults",
            title: "Metadados da Análise".to_string(),
            blocks: vec![Block::Counters(vec![
                (
                    "Tempo de Processamento".to_string(),
                    meta.processing_time_formatted.clone().unwrap_or_else(|| "N/A".to_string()),
                ),
                (
                    "Engine de Análise".to_string(),
                    meta.analysis_engine.clone().unwrap_or_else(|| "N/A".to_string()),
                ),
                (
                    "Score de Qualidade".to_string(),
                    meta.quality_score
                        .map(|q| format!("{}%", q))
                        .unwrap_or_else(|| "N/A".to_string()),
                ),
                ("Fontes Analisadas".to_string(), meta.real_data_sources.to_string()),
                (
                    "Conteúdo Analisado".to_string(),
                    format!("{} chars", meta.total_content_analyzed),
                ),
            ])],
        });
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{AvatarSection, MentalDriver, ResearchSection};
    use serde_json::json;

    #[test]
    fn empty_report_shapes_to_nothing() {
        assert!(shape_report(&AnalysisResult::default()).is_empty());
    }

    #[test]
    fn shaping_is_deterministic() {
        let report: AnalysisResult = serde_json::from_value(json!({
            "avatar_ultra_detalhado": {
                "perfil_demografico": {"faixa_etaria": "25-40", "renda_mensal": "R$5k+"},
                "dores_viscerais": ["sem tempo"]
            },
            "insights_exclusivos": ["nicho em alta"]
        }))
        .unwrap();
        assert_eq!(shape_report(&report), shape_report(&report));
    }

    #[test]
    fn avatar_subpieces_are_independent() {
        let avatar = AvatarSection {
            dores_viscerais: Some(vec!["dor".to_string()]),
            ..Default::default()
        };
        let report = AnalysisResult { avatar_ultra_detalhado: Some(avatar), ..Default::default() };
        let sections = shape_report(&report);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].mount, "avatarResults");
        // only the one present list, no cards
        assert_eq!(sections[0].blocks.len(), 1);
        match &sections[0].blocks[0] {
            Block::List { title, .. } => assert_eq!(title, "Dores Viscerais"),
            other => panic!("unexpected block: {:?}", other),
        }
    }

    #[test]
    fn card_labels_are_humanized() {
        let report: AnalysisResult = serde_json::from_value(json!({
            "avatar_ultra_detalhado": {
                "perfil_demografico": {"faixa_etaria": "25-40"}
            }
        }))
        .unwrap();
        let sections = shape_report(&report);
        match &sections[0].blocks[0] {
            Block::Card { items, .. } => assert_eq!(items[0].0, "faixa etaria"),
            other => panic!("unexpected block: {:?}", other),
        }
    }

    #[test]
    fn driver_subgroups_render_independently() {
        let drivers = vec![
            MentalDriver {
                nome: "Urgência".to_string(),
                gatilho_central: "escassez".to_string(),
                definicao_visceral: "medo".to_string(),
                roteiro_ativacao: None,
                frases_ancoragem: Some(vec!["agora ou nunca".to_string()]),
            },
            MentalDriver {
                nome: "Prova".to_string(),
                gatilho_central: "confiança".to_string(),
                definicao_visceral: "ver para crer".to_string(),
                roteiro_ativacao: Some(Default::default()),
                frases_ancoragem: None,
            },
        ];
        let report =
            AnalysisResult { drivers_mentais_customizados: Some(drivers), ..Default::default() };
        let sections = shape_report(&report);
        match (&sections[0].blocks[0], &sections[0].blocks[1]) {
            (
                Block::Driver { script: None, anchors: a1, .. },
                Block::Driver { script: Some(_), anchors: a2, .. },
            ) => {
                assert_eq!(a1.len(), 1);
                assert!(a2.is_empty());
            }
            other => panic!("unexpected blocks: {:?}", other),
        }
    }

    #[test]
    fn research_lists_are_capped() {
        let research = ResearchSection {
            total_queries: 40,
            queries_executadas: Some((0..40).map(|i| format!("q{}", i)).collect()),
            resultados_detalhados: Some(
                (0..30)
                    .map(|i| crate::report::ResearchSource {
                        title: format!("t{}", i),
                        url: format!("https://example.com/{}", i),
                        source: "web".to_string(),
                    })
                    .collect(),
            ),
            ..Default::default()
        };
        let report =
            AnalysisResult { pesquisa_web_massiva: Some(research), ..Default::default() };
        let sections = shape_report(&report);
        let mut query_count = None;
        let mut source_count = None;
        for block in &sections[0].blocks {
            match block {
                Block::List { items, .. } => query_count = Some(items.len()),
                Block::Sources(sources) => source_count = Some(sources.len()),
                _ => {}
            }
        }
        assert_eq!(query_count, Some(10));
        assert_eq!(source_count, Some(15));
    }
}
