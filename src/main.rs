use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};

use mercado::backend::http::HttpBackend;
use mercado::controller::{AnalysisController, NoAttachments, SubmitOutcome};
use mercado::diagnostics::{Diagnostics, SEARCH_MAX_RESULTS};
use mercado::logging::{json_log, obj, v_str};
use mercado::notify::LogNotifier;
use mercado::state::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();
    json_log(
        "startup",
        obj(&[
            ("api_base", v_str(&cfg.api_base)),
            ("session_id", v_str(&cfg.session_id)),
        ]),
    );

    let backend = Arc::new(HttpBackend::new(&cfg));
    let notifier = Arc::new(LogNotifier);
    let diagnostics = Diagnostics::new(backend.clone(), notifier.clone());
    let controller =
        AnalysisController::new(cfg.clone(), backend, notifier, Arc::new(NoAttachments));

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("analyze") => {
            let form_path = args.next().unwrap_or_else(|| "form.json".to_string());
            let fields = load_form(&form_path)?;

            diagnostics.load_stats().await;
            if let Some((tier, line)) = diagnostics.status_line() {
                json_log("extractors", obj(&[("tier", v_str(tier.as_str())), ("status", v_str(&line))]));
            }

            match controller.submit(&fields).await {
                SubmitOutcome::Completed(_) => {
                    let report_path = args.next().unwrap_or_else(|| "report.html".to_string());
                    let doc = controller.mounts().to_document("Análise de Mercado");
                    std::fs::write(&report_path, doc)
                        .with_context(|| format!("cannot write {}", report_path))?;
                    json_log("report", obj(&[("path", v_str(&report_path))]));

                    if std::env::var("EXPORT_PDF").map(|v| v == "1").unwrap_or(false) {
                        let path = controller.export_pdf().await?;
                        json_log("pdf", obj(&[("path", v_str(&path.to_string_lossy()))]));
                    }
                    Ok(())
                }
                SubmitOutcome::Rejected => Err(anyhow!("análise já em andamento")),
                SubmitOutcome::Failed(err) => Err(anyhow!(err.user_message())),
            }
        }
        Some("test-extraction") => {
            let url = args.next().ok_or_else(|| anyhow!("uso: test-extraction <url>"))?;
            let preview = diagnostics.test_extraction(&url).await?;
            println!("{} ({} chars, qualidade {}%)", preview.url, preview.content_length, preview.score);
            println!("{}", preview.preview);
            Ok(())
        }
        Some("test-search") => {
            let query = args.next().ok_or_else(|| anyhow!("uso: test-search <query>"))?;
            let count = diagnostics.test_search(&query, SEARCH_MAX_RESULTS).await?;
            println!("{} resultados", count);
            Ok(())
        }
        Some("stats") => {
            let overview = diagnostics.stats_overview().await?;
            println!(
                "global: {:.1}% sucesso ({} extrações, {} falhas) [{}]",
                overview.success_rate,
                overview.total_extractions,
                overview.total_failures,
                overview.tier.as_str()
            );
            for line in &overview.extractors {
                if line.available {
                    println!(
                        "  {}: {:.1}% em {} usos, {:.2}s médio [{}]",
                        line.name,
                        line.success_rate,
                        line.usage_count,
                        line.avg_response_time,
                        line.tier.as_str()
                    );
                } else {
                    println!(
                        "  {}: indisponível ({})",
                        line.name,
                        line.reason.as_deref().unwrap_or("sem motivo informado")
                    );
                }
            }
            Ok(())
        }
        Some("reset") => {
            diagnostics.reset().await?;
            Ok(())
        }
        _ => {
            eprintln!("uso: mercado <analyze [form.json] [report.html] | test-extraction <url> | test-search <query> | stats | reset>");
            Ok(())
        }
    }
}

fn load_form(path: &str) -> Result<BTreeMap<String, String>> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path))?;
    let fields: BTreeMap<String, String> =
        serde_json::from_str(&raw).with_context(|| format!("invalid form file {}", path))?;
    Ok(fields)
}
