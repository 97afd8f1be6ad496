use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use checkers_ai::AiEngine;
use checkers_cli::{Command, CommandError, GameError, GameSession, GameSettings, TurnEvent, AI, HELP};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "传送区跳棋：人类执白对战 AI", long_about = None)]
struct Args {
    /// AI 搜索深度
    #[arg(short, long)]
    depth: Option<u8>,

    /// 随机种子
    #[arg(short, long)]
    seed: Option<u64>,

    /// 设置文件路径
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 每回合激活连跳的概率
    #[arg(long)]
    multi_jump_chance: Option<f64>,
}

fn load_settings(args: &Args) -> Result<GameSettings> {
    let mut settings = match &args.config {
        Some(path) => GameSettings::load_from(path)
            .with_context(|| format!("加载设置失败: {}", path.display()))?,
        None => GameSettings::load(),
    };

    if let Some(depth) = args.depth {
        settings.search_depth = depth;
    }
    if let Some(seed) = args.seed {
        settings.seed = Some(seed);
    }
    if let Some(chance) = args.multi_jump_chance {
        settings.multi_jump_chance = chance;
    }
    settings.validate().context("设置不合法")?;
    Ok(settings)
}

fn report(events: &[TurnEvent]) {
    for event in events {
        println!("> {}", event);
    }
}

fn render(session: &GameSession) {
    println!();
    print!("{}", session.board());

    if let Some(outcome) = session.outcome() {
        println!("对局结束：{}，输入 new 重新开始", outcome);
        return;
    }

    let mut status = format!(
        "轮到 {}，剩余 {} 秒，无吃子 {} 步",
        session.current_turn(),
        session.clock().remaining_ms() / 1000,
        session.moves_without_capture()
    );
    if session.multi_jump_active() {
        status.push_str("，连跳已激活");
    }
    if session.draw_offered() {
        status.push_str("，可输入 draw 接受和棋");
    }
    println!("{}", status);

    if let Some(sq) = session.phase().selected() {
        let targets: Vec<String> = session.legal_targets().iter().map(|t| t.to_string()).collect();
        println!("已选中 {}，可走: {}", sq, targets.join(" "));
    }
}

/// 轮到 AI 时立即走完它的回合
fn drive_ai(session: &mut GameSession, engine: &mut AiEngine) {
    if session.current_turn() == AI && !session.is_over() {
        let events = session.play_ai_turn(engine);
        info!("AI 回合结束，搜索节点 {}", engine.nodes_searched());
        report(&events);
    }
}

fn handle(session: &mut GameSession, command: Command) -> Result<Vec<TurnEvent>, GameError> {
    match command {
        Command::Select(sq) => {
            // 已选中棋子时，输入合法目标格即走棋
            if session.phase().selected().is_some() && session.legal_targets().contains(&sq) {
                session.move_selected(sq)
            } else {
                session.select(sq).map(|_| Vec::new())
            }
        }
        Command::Move { from, to } => {
            session.select(from)?;
            session.move_selected(to)
        }
        Command::Draw => session.accept_draw().map(|event| vec![event]),
        Command::New | Command::Help | Command::Quit => Ok(Vec::new()),
    }
}

fn run(session: &mut GameSession, engine: &mut AiEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("{}", HELP);
    drive_ai(session, engine);
    render(session);

    loop {
        print!("> ");
        io::stdout().flush().context("写入终端失败")?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("读取输入失败")?;

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(CommandError::Empty) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => {
                println!("{}", HELP);
                continue;
            }
            Command::New => session.reset(),
            _ => {
                // 思考时间超过回合时限，本次输入作废
                let expired = session.check_clock();
                if expired.is_empty() {
                    match handle(session, command) {
                        Ok(events) => report(&events),
                        Err(e) => println!("{}", e),
                    }
                } else {
                    report(&expired);
                }
            }
        }

        drive_ai(session, engine);
        render(session);
    }

    Ok(())
}

fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("checkers_cli=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let settings = load_settings(&args)?;
    info!("传送区跳棋启动: {:?}", settings);

    let rng = match settings.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let mut engine = AiEngine::new(settings.ai_config());
    let mut session = GameSession::new(settings, rng);

    run(&mut session, &mut engine)
}
