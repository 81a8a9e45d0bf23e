use crate::app::export::export_plans_csv;
use crate::app::report;
use crate::config::cli::{Command, DiagnoseArgs};
use crate::core::planner::{PlanRequest, Planner};
use crate::core::progress::SavingsProgress;
use crate::core::session::PlanSession;
use crate::domain::ports::{PlanStore, RegionLookup};
use crate::utils::error::{PlannerError, Result};
use crate::utils::format::format_yen;
use chrono::Local;
use std::io::Write;

/// 執行一個子命令，輸出寫到 `out`
pub async fn run_command<S, L, W>(
    planner: &Planner<S, L>,
    session: &mut PlanSession,
    command: Command,
    out: &mut W,
) -> Result<()>
where
    S: PlanStore,
    L: RegionLookup,
    W: Write,
{
    match command {
        Command::Diagnose(args) => diagnose(planner, session, args, out).await,
        Command::Plans => {
            let plans = planner.list_plans().await?;
            if plans.is_empty() {
                writeln!(
                    out,
                    "まだ保存されたプランはありません。`diagnose --save` で作成してください。"
                )?;
                return Ok(());
            }
            writeln!(out, "📋 保存したプラン一覧 ({})", plans.len())?;
            for plan in &plans {
                // 紀錄讀取失敗時仍列出計畫本身
                let progress = match planner.plan_progress(plan).await {
                    Ok(progress) => Some(progress),
                    Err(e) => {
                        tracing::warn!("Could not load savings log for plan #{}: {}", plan.id, e);
                        None
                    }
                };
                write!(out, "{}", report::render_plan(plan, progress.as_ref()))?;
            }
            Ok(())
        }
        Command::Delete { plan_id } => {
            planner.delete_plan(plan_id).await?;
            writeln!(out, "🗑️ プラン #{} を削除しました", plan_id)?;
            Ok(())
        }
        Command::Deposit {
            plan_id,
            amount,
            memo,
        } => {
            let entry = planner.record_savings(plan_id, amount, memo).await?;
            writeln!(
                out,
                "💰 プラン #{} に {} を記録しました",
                entry.plan_id,
                format_yen(entry.amount)
            )?;
            Ok(())
        }
        Command::History { plan_id } => {
            let plans = planner.list_plans().await?;
            let entries = planner.plan_history(plan_id).await?;
            let target = plans
                .iter()
                .find(|plan| plan.id == plan_id)
                .map(|plan| plan.target_amount)
                .ok_or_else(|| {
                    PlannerError::validation(format!("plan #{} does not exist", plan_id))
                })?;
            let progress = SavingsProgress::from_entries(target, &entries);
            write!(out, "{}", report::render_history(plan_id, &entries, &progress))?;
            Ok(())
        }
        Command::Export { path } => {
            let plans = planner.list_plans().await?;
            let written = export_plans_csv(&path, &plans)?;
            writeln!(out, "📁 {} 件のプランを {} に書き出しました", written, path.display())?;
            Ok(())
        }
        Command::Lookup { postal_code } => {
            let found = planner.lookup_postal_code(&postal_code).await;
            write!(out, "{}", report::render_lookup(&postal_code, found.as_ref()))?;
            Ok(())
        }
        Command::Regions => {
            write!(out, "{}", report::render_regions())?;
            Ok(())
        }
    }
}

async fn diagnose<S, L, W>(
    planner: &Planner<S, L>,
    session: &mut PlanSession,
    args: DiagnoseArgs,
    out: &mut W,
) -> Result<()>
where
    S: PlanStore,
    L: RegionLookup,
    W: Write,
{
    let request = PlanRequest {
        goal_name: args.goal,
        income: args.income,
        rent: args.rent,
        target_amount: args.target,
        region: args.region,
        postal_code: args.postal_code,
        duration_months: args.months,
    };

    let diagnosis = planner.diagnose(session, request).await?;
    write!(
        out,
        "{}",
        report::render_diagnosis(diagnosis, Local::now().date_naive())
    )?;

    if args.save {
        let plan = planner.save(session).await?;
        writeln!(
            out,
            "\n✅ 「{}」のプランを保存しました (#{})",
            plan.goal_name, plan.id
        )?;
    }

    Ok(())
}
