use clap::Parser;
use gara_client::app::pages::{self, contests, header, ranking, submit};
use gara_client::core::countdown::CountdownPhase;
use gara_client::core::document::{self, Document};
use gara_client::core::refresh::ScheduledRefresh;
use gara_client::domain::model::FormData;
use gara_client::domain::ports::ConfigProvider;
use gara_client::utils::error::ErrorSeverity;
use gara_client::utils::{logger, validation::Validate};
use gara_client::{
    ApiClient, CliConfig, Command, FileSessionStore, FormBridge, GaraError, Page, PageContext,
    Result, Settings, TerminalNavigator, TerminalNotifier,
};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting gara-client");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let settings = match Settings::resolve(cli.config.as_deref(), cli.overrides())
        .and_then(|settings| settings.validate().map(|_| settings))
    {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli.command, &settings, cli.yes).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(command: Command, settings: &Settings, assume_yes: bool) -> Result<()> {
    let ctx = PageContext {
        client: ApiClient::from_config(settings)?,
        navigator: Arc::new(TerminalNavigator::new(settings.base_url())),
        notifier: Arc::new(TerminalNotifier::new(assume_yes)),
        sessions: Arc::new(FileSessionStore::new(settings.session_path())),
        document: Document::new().into_shared(),
    };

    match command {
        Command::Login {
            username,
            password,
            remember_me,
        } => {
            let mut fields = FormData::new()
                .with("username", username)
                .with("password", password);
            if remember_me {
                fields.append("remember_me", "on");
            }
            submit_form(&ctx, settings, Page::Contests, header::AUTHENTICATE_FORM, fields).await
        }
        Command::Register {
            username,
            password,
            email,
        } => {
            let mut fields = FormData::new()
                .with("register_username", username)
                .with("register_password", password);
            if let Some(email) = email {
                fields.append("register_email", email);
            }
            submit_form(&ctx, settings, Page::Contests, header::REGISTER_FORM, fields).await
        }
        Command::Logout => header::logout(&ctx).await,
        Command::Form {
            form_id,
            fields,
            contest,
        } => {
            let page = Page::for_form(&form_id, contest)?;
            submit_form(&ctx, settings, page, &form_id, fields.into_iter().collect()).await
        }
        Command::DeleteContest { contest_id } => {
            contests::delete_contest(&ctx, contest_id).await?;
            Ok(())
        }
        Command::DeleteTeam {
            contest_id,
            team_id,
        } => {
            pages::settings::delete_team(&ctx, contest_id, team_id).await?;
            Ok(())
        }
        Command::Answer {
            contest_id,
            team,
            question,
            answer,
        } => {
            let fields = FormData::new()
                .with("team_id", team)
                .with("question_id", question)
                .with("answer", answer);
            let page = Page::Submit { contest_id };
            submit_form(&ctx, settings, page, submit::SUBMITTER_FORM, fields).await
        }
        Command::Jolly {
            contest_id,
            team,
            question,
        } => {
            let ctx = open_page(ctx, settings, Page::Submit { contest_id })?.0;
            if let Some(form) = document::lock(&ctx.document).form_mut(submit::SUBMITTER_FORM) {
                form.values = FormData::new()
                    .with("team_id", team)
                    .with("question_id", question);
            }
            submit::submit_jolly(&ctx, contest_id, &submit::AfterSubmit::default()).await
        }
        Command::Link { contest_id } => {
            println!("{}", contests::contest_link(settings.base_url(), contest_id));
            Ok(())
        }
        Command::Countdown { contest_id, watch } => countdown(&ctx, contest_id, watch).await,
        Command::Ranking { contest_id, .. } => follow_ranking(&ctx, settings, contest_id).await,
    }
}

/// Builds `page`, applies configured endpoint overrides and binds its forms.
fn open_page(
    mut ctx: PageContext,
    settings: &Settings,
    page: Page,
) -> Result<(PageContext, FormBridge)> {
    let mut doc = page.document(chrono::Utc::now().naive_utc());
    settings.apply_form_overrides(&mut doc)?;
    ctx.document = doc.into_shared();

    let mut bridge = FormBridge::new(ctx.client.clone());
    page.setup(&ctx, &mut bridge);
    Ok((ctx, bridge))
}

async fn submit_form(
    ctx: &PageContext,
    settings: &Settings,
    page: Page,
    form_id: &str,
    fields: FormData,
) -> Result<()> {
    let (ctx, bridge) = open_page(ctx.clone(), settings, page)?;
    let event = pages::fill_and_submit(&ctx, &bridge, form_id, fields).await?;
    if !event.default_prevented() {
        return Err(GaraError::ProcessingError {
            message: format!("form '{form_id}' is not bound on {page:?}"),
        });
    }
    Ok(())
}

async fn countdown(ctx: &PageContext, contest_id: i64, watch: bool) -> Result<()> {
    let Some(clock) = ranking::load_countdown(ctx, contest_id).await? else {
        return Ok(());
    };

    if !watch {
        println!("{}", clock.display_at(chrono::Utc::now().naive_utc()));
        return Ok(());
    }

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => break,
        }

        let now = chrono::Utc::now().naive_utc();
        println!("{}", clock.display_at(now));
        if clock.phase_at(now) == CountdownPhase::Ended {
            break;
        }
    }
    Ok(())
}

async fn follow_ranking(ctx: &PageContext, settings: &Settings, contest_id: i64) -> Result<()> {
    let session = ctx.session().await?;
    let path = ranking::ranking_path(settings.ranking_path(), contest_id);
    let source = ranking::RankingSource::new(ctx.client.clone(), session, path);

    let refresh = ScheduledRefresh::start(
        settings.refresh_interval(),
        source,
        Box::new(|content: &str| println!("{content}")),
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("Interrupted, stopping ranking refresh");
    refresh.stop().await;
    Ok(())
}
