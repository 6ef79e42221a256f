//! Entry point: parse CLI and dispatch to command handlers.

use anyhow::Context;
use clap::Parser;
use mlb_stats::{
    cli::{Commands, MlbStats, TrendArgs},
    commands::{
        box_scores::{handle_load_box_scores, LineKind},
        init_db::{handle_init_db, handle_schema},
        load_all::{handle_load_all, LoadAllParams},
        load_games::handle_load_games,
        load_players::handle_load_players,
        load_teams::handle_load_teams,
        sleep_duration,
        trends::{
            handle_run_diff, handle_team_trend, handle_win_model, TrendParams, WinModelParams,
        },
    },
    logging::setup_logging,
    DateRange,
};
use std::path::PathBuf;

fn trend_params(db: Option<PathBuf>, args: TrendArgs) -> TrendParams {
    TrendParams {
        db,
        team: args.team,
        start: args.dates.start,
        end: args.dates.end,
        as_json: args.json,
    }
}

/// Run the CLI.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app = MlbStats::parse();
    setup_logging(app.verbose);
    let db = app.db;

    match app.command {
        Commands::InitDb => handle_init_db(db, app.verbose).context("init-db failed")?,

        Commands::Schema => handle_schema()?,

        Commands::LoadTeams => handle_load_teams(db).await.context("load-teams failed")?,

        Commands::LoadPlayers => handle_load_players(db)
            .await
            .context("load-players failed")?,

        Commands::LoadGames { dates } => handle_load_games(db, dates.to_range())
            .await
            .context("load-games failed")?,

        Commands::LoadBatting { dates, sleep } => handle_load_box_scores(
            db,
            dates.to_range(),
            LineKind::Batting,
            sleep_duration(sleep),
        )
        .await
        .context("load-batting failed")?,

        Commands::LoadPitching { dates, sleep } => handle_load_box_scores(
            db,
            dates.to_range(),
            LineKind::Pitching,
            sleep_duration(sleep),
        )
        .await
        .context("load-pitching failed")?,

        Commands::LoadAll {
            start,
            end,
            skip_teams,
            skip_players,
            skip_games,
            skip_batting,
            skip_pitching,
            sleep,
        } => handle_load_all(LoadAllParams {
            db,
            range: DateRange::new(start, end),
            skip_teams,
            skip_players,
            skip_games,
            skip_batting,
            skip_pitching,
            sleep: sleep_duration(sleep),
        })
        .await
        .context("load-all failed")?,

        Commands::TeamTrend {
            team,
            all,
            window,
            dates,
            json,
        } => handle_team_trend(
            TrendParams {
                db,
                team: team.unwrap_or_default(),
                start: dates.start,
                end: dates.end,
                as_json: json,
            },
            window,
            all,
        )?,

        Commands::RunDiff { trend } => handle_run_diff(trend_params(db, trend))?,

        Commands::WinModel { team, dates, json } => handle_win_model(WinModelParams {
            db,
            team,
            start: dates.start,
            end: dates.end,
            as_json: json,
        })?,
    }

    Ok(())
}
