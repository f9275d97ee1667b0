//! Line-oriented operator console.
//!
//! One operator drives a single session: lifecycle commands, agenda item
//! transitions, roll call and votes. A refused transition prints the
//! actions that are currently legal instead of a bare error.

use anyhow::Result;
use colored::Colorize;
use plenum_application::ports::MemberRoster;
use plenum_application::{
    AgendaCommands, CommandError, SessionCommands, SessionQueries, SessionSnapshot,
    VotingCommands,
};
use plenum_domain::{
    ActionKind, ItemId, ItemOutcome, MemberId, MoveDirection, NewItem, Section, SessionId,
    TemplateId, TemplateMode, VoteChoice,
};
use plenum_infrastructure::InMemorySessionRepository;
use std::io::Write as _;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

type Repo = InMemorySessionRepository;

pub struct Console {
    chamber: String,
    session_id: SessionId,
    sessions: SessionCommands<Repo>,
    agenda: AgendaCommands<Repo>,
    voting: VotingCommands<Repo>,
    queries: SessionQueries<Repo>,
    roster: Arc<dyn MemberRoster>,
}

enum Flow {
    Continue,
    Quit,
}

impl Console {
    pub fn new(
        chamber: String,
        session_id: SessionId,
        sessions: SessionCommands<Repo>,
        agenda: AgendaCommands<Repo>,
        voting: VotingCommands<Repo>,
        queries: SessionQueries<Repo>,
        roster: Arc<dyn MemberRoster>,
    ) -> Self {
        Self {
            chamber,
            session_id,
            sessions,
            agenda,
            voting,
            queries,
            roster,
        }
    }

    pub async fn run(self) -> Result<()> {
        println!();
        println!(
            "{} {}",
            self.chamber.bold(),
            format!("(session {})", self.session_id).dimmed()
        );
        println!("Type {} for the command list.", "help".cyan());
        println!();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("{} ", "plenum>".cyan().bold());
            let _ = std::io::stdout().flush();

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Flow::Quit = self.dispatch(line).await {
                break;
            }
        }
        Ok(())
    }

    async fn dispatch(&self, line: &str) -> Flow {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let (cmd, args) = (tokens[0], &tokens[1..]);

        match cmd {
            "quit" | "exit" => return Flow::Quit,
            "help" => print_help(),

            "begin" => self.show(self.sessions.begin(&self.session_id).await, None).await,
            "suspend" => self.show(self.sessions.suspend(&self.session_id).await, None).await,
            "resume" => self.show(self.sessions.resume(&self.session_id).await, None).await,
            "conclude" => self.show(self.sessions.conclude(&self.session_id).await, None).await,
            "cancel" => self.show(self.sessions.cancel(&self.session_id).await, None).await,

            "add" => self.cmd_add(args).await,
            "template" => self.cmd_template(args).await,
            "start" => self.cmd_start(args).await,
            "pause" => self.cmd_on_current(args, ItemCmd::Pause).await,
            "unpause" => self.cmd_on_current(args, ItemCmd::Unpause).await,
            "vote" => self.cmd_vote(args).await,
            "finish" => self.cmd_finish(args).await,
            "withdraw" => self.cmd_withdraw(args).await,
            "review" => self.cmd_review(args).await,
            "unreview" => self.cmd_on_current(args, ItemCmd::Unreview).await,
            "move" => self.cmd_move(args).await,

            "status" => self.cmd_status().await,
            "quorum" => self.cmd_quorum().await,
            "tally" => self.cmd_tally(args).await,
            "elapsed" => self.cmd_elapsed().await,
            "present" => self.cmd_present(args).await,
            "roster" => self.cmd_roster().await,

            other => {
                println!("{} unknown command: {other}", "!".red());
            }
        }
        Flow::Continue
    }

    async fn cmd_add(&self, args: &[&str]) {
        let [section, kind, title @ ..] = args else {
            println!("{} usage: add <section> <kind> <title...>", "!".red());
            return;
        };
        if title.is_empty() {
            println!("{} usage: add <section> <kind> <title...>", "!".red());
            return;
        }
        let section: Section = match section.parse() {
            Ok(s) => s,
            Err(e) => return println!("{} {e}", "!".red()),
        };
        let kind: ActionKind = match kind.parse() {
            Ok(k) => k,
            Err(e) => return println!("{} {e}", "!".red()),
        };
        let new = NewItem {
            title: title.join(" "),
            description: None,
            proposition: None,
            action_kind: kind,
        };
        self.show(self.agenda.add_item(&self.session_id, section, new).await, None)
            .await;
    }

    async fn cmd_template(&self, args: &[&str]) {
        let Some(id) = args.first() else {
            println!("{} usage: template <id> [replace|append]", "!".red());
            return;
        };
        let mode = match args.get(1) {
            Some(m) => match m.parse::<TemplateMode>() {
                Ok(mode) => mode,
                Err(e) => return println!("{} {e}", "!".red()),
            },
            None => TemplateMode::Replace,
        };
        self.show(
            self.agenda
                .apply_template(&self.session_id, &TemplateId::new(*id), mode)
                .await,
            None,
        )
        .await;
    }

    async fn cmd_start(&self, args: &[&str]) {
        let Some(id) = args.first() else {
            println!("{} usage: start <item>", "!".red());
            return;
        };
        let item = ItemId::new(*id);
        self.show(self.agenda.start_item(&self.session_id, &item).await, Some(&item))
            .await;
    }

    async fn cmd_on_current(&self, args: &[&str], cmd: ItemCmd) {
        let item = match self.target_item(args.first()).await {
            Some(item) => item,
            None => return,
        };
        let result = match cmd {
            ItemCmd::Pause => self.agenda.pause_item(&self.session_id, &item).await,
            ItemCmd::Unpause => self.agenda.resume_item(&self.session_id, &item).await,
            ItemCmd::Unreview => {
                self.agenda.resume_from_review(&self.session_id, &item).await
            }
        };
        self.show(result, Some(&item)).await;
    }

    async fn cmd_vote(&self, args: &[&str]) {
        match args {
            ["open"] => {
                let Some(item) = self.target_item(None).await else {
                    return;
                };
                self.show(self.agenda.open_vote(&self.session_id, &item).await, Some(&item))
                    .await;
            }
            [member, choice] => {
                let choice: VoteChoice = match choice.parse() {
                    Ok(c) => c,
                    Err(e) => return println!("{} {e}", "!".red()),
                };
                let Some(item) = self.target_item(None).await else {
                    return;
                };
                self.show(
                    self.voting
                        .cast_vote(&self.session_id, &item, MemberId::new(*member), choice)
                        .await,
                    Some(&item),
                )
                .await;
            }
            _ => println!("{} usage: vote open | vote <member> <yes|no|abstain>", "!".red()),
        }
    }

    async fn cmd_finish(&self, args: &[&str]) {
        let outcome = match args.first() {
            Some(o) => match o.parse::<ItemOutcome>() {
                Ok(outcome) => Some(outcome),
                Err(e) => return println!("{} {e}", "!".red()),
            },
            None => None,
        };
        let Some(item) = self.target_item(None).await else {
            return;
        };
        self.show(
            self.agenda.finish_item(&self.session_id, &item, outcome).await,
            Some(&item),
        )
        .await;
    }

    async fn cmd_withdraw(&self, args: &[&str]) {
        if args.is_empty() {
            println!("{} usage: withdraw <reason...>", "!".red());
            return;
        }
        let Some(item) = self.target_item(None).await else {
            return;
        };
        self.show(
            self.agenda
                .withdraw_item(&self.session_id, &item, args.join(" "))
                .await,
            Some(&item),
        )
        .await;
    }

    async fn cmd_review(&self, args: &[&str]) {
        let Some(member) = args.first() else {
            println!("{} usage: review <member>", "!".red());
            return;
        };
        let Some(item) = self.target_item(None).await else {
            return;
        };
        self.show(
            self.agenda
                .request_review(&self.session_id, &item, MemberId::new(*member))
                .await,
            Some(&item),
        )
        .await;
    }

    async fn cmd_move(&self, args: &[&str]) {
        match args {
            [id, dir @ ("up" | "down")] => {
                let item = ItemId::new(*id);
                let direction = if *dir == "up" {
                    MoveDirection::Up
                } else {
                    MoveDirection::Down
                };
                self.show(
                    self.agenda.move_item(&self.session_id, &item, direction).await,
                    Some(&item),
                )
                .await;
            }
            [id, "to", section, pos] => {
                let item = ItemId::new(*id);
                let section: Section = match section.parse() {
                    Ok(s) => s,
                    Err(e) => return println!("{} {e}", "!".red()),
                };
                let Ok(pos) = pos.parse::<u32>() else {
                    println!("{} position must be a number", "!".red());
                    return;
                };
                self.show(
                    self.agenda
                        .move_item_to(&self.session_id, &item, section, pos)
                        .await,
                    Some(&item),
                )
                .await;
            }
            _ => println!(
                "{} usage: move <item> up|down | move <item> to <section> <pos>",
                "!".red()
            ),
        }
    }

    async fn cmd_status(&self) {
        match self.queries.snapshot(&self.session_id).await {
            Ok(snapshot) => print_agenda(&snapshot),
            Err(err) => println!("{} {err}", "!".red()),
        }
    }

    async fn cmd_quorum(&self) {
        match self.queries.quorum(&self.session_id).await {
            Ok(q) => {
                let verdict = if q.has_majority() {
                    "quorum met".green()
                } else {
                    "no quorum".yellow()
                };
                println!(
                    "{}/{} present, {} absent ({:.1}%) - {verdict}",
                    q.present, q.total, q.absent, q.percent
                );
            }
            Err(err) => println!("{} {err}", "!".red()),
        }
    }

    async fn cmd_tally(&self, args: &[&str]) {
        let item = match args.first() {
            Some(id) => ItemId::new(*id),
            None => match self.target_item(None).await {
                Some(item) => item,
                None => return,
            },
        };
        match self.queries.tally(&self.session_id, &item).await {
            Ok(t) => {
                let verdict = if t.approved {
                    "approved".green()
                } else {
                    "not approved".red()
                };
                println!(
                    "{item}: {} yes / {} no / {} abstain ({} votes) - {verdict}",
                    t.yes, t.no, t.abstain, t.total
                );
            }
            Err(err) => println!("{} {err}", "!".red()),
        }
    }

    async fn cmd_elapsed(&self) {
        match self.queries.snapshot(&self.session_id).await {
            Ok(snapshot) => {
                println!("session: {}", fmt_secs(snapshot.elapsed_secs));
                if let Some(id) = &snapshot.current_item
                    && let Some(item) = snapshot.item(id)
                {
                    println!("item {id}: {}", fmt_secs(item.elapsed_secs));
                }
            }
            Err(err) => println!("{} {err}", "!".red()),
        }
    }

    async fn cmd_present(&self, args: &[&str]) {
        let [member, rest @ ..] = args else {
            println!("{} usage: present <member> [on|off] [justification...]", "!".red());
            return;
        };
        let (present, justification) = match rest {
            [] | ["on"] => (true, None),
            ["off", just @ ..] => {
                let just = (!just.is_empty()).then(|| just.join(" "));
                (false, just)
            }
            _ => {
                println!("{} usage: present <member> [on|off] [justification...]", "!".red());
                return;
            }
        };
        self.show(
            self.voting
                .set_presence(&self.session_id, MemberId::new(*member), present, justification)
                .await,
            None,
        )
        .await;
    }

    async fn cmd_roster(&self) {
        let members = self.roster.members().await;
        if members.is_empty() {
            println!("{}", "no roster configured".dimmed());
            return;
        }
        for member in members {
            println!("{}  {} ({})", member.id, member.name, member.party);
        }
    }

    /// Resolve the item a command targets: explicit argument, else the
    /// session's current item.
    async fn target_item(&self, arg: Option<&&str>) -> Option<ItemId> {
        if let Some(id) = arg {
            return Some(ItemId::new(*id));
        }
        match self.queries.snapshot(&self.session_id).await {
            Ok(snapshot) => {
                if snapshot.current_item.is_none() {
                    println!("{} no active item", "!".yellow());
                }
                snapshot.current_item
            }
            Err(err) => {
                println!("{} {err}", "!".red());
                None
            }
        }
    }

    async fn show(
        &self,
        result: Result<SessionSnapshot, CommandError>,
        item: Option<&ItemId>,
    ) {
        match result {
            Ok(snapshot) => print_summary(&snapshot),
            Err(err) => self.report(err, item).await,
        }
    }

    /// Print the error; for a refused transition, also print what the
    /// targeted item (or the session) would currently accept.
    async fn report(&self, err: CommandError, item: Option<&ItemId>) {
        println!("{} {err}", "!".red());
        if !err.is_illegal_transition() {
            return;
        }
        let Ok(snapshot) = self.queries.snapshot(&self.session_id).await else {
            return;
        };
        if let Some(item) = item.and_then(|id| snapshot.item(id)) {
            let actions: Vec<&str> = item.legal_actions.iter().map(|a| a.label()).collect();
            if actions.is_empty() {
                println!("  item {} is {}; nothing more can be done", item.id, item.status);
            } else {
                println!("  legal now for {}: {}", item.id, actions.join(", ").cyan());
            }
        } else {
            println!("  session is {}", snapshot.status.label().cyan());
        }
    }
}

enum ItemCmd {
    Pause,
    Unpause,
    Unreview,
}

fn print_summary(snapshot: &SessionSnapshot) {
    let mut line = format!(
        "{} session {} - {}",
        "ok".green(),
        snapshot.id,
        snapshot.status.label().bold()
    );
    if let Some(id) = &snapshot.current_item
        && let Some(item) = snapshot.item(id)
    {
        line.push_str(&format!(
            " | {} \"{}\" {} ({})",
            item.id,
            item.title,
            item.status,
            fmt_secs(item.elapsed_secs)
        ));
    }
    println!("{line}");
}

fn print_agenda(snapshot: &SessionSnapshot) {
    println!(
        "{} #{} ({}) - {}, elapsed {}",
        snapshot.id.to_string().bold(),
        snapshot.number,
        snapshot.kind.label(),
        snapshot.status.label().bold(),
        fmt_secs(snapshot.elapsed_secs)
    );
    println!(
        "quorum: {}/{} present ({:.1}%)",
        snapshot.quorum.present, snapshot.quorum.total, snapshot.quorum.percent
    );

    let mut section = None;
    for item in &snapshot.items {
        if section != Some(item.section) {
            section = Some(item.section);
            println!("{}", item.section.label().underline());
        }
        let marker = if snapshot.current_item.as_ref() == Some(&item.id) {
            ">".green().bold().to_string()
        } else {
            " ".to_string()
        };
        let status = match item.status {
            s if s.is_active() => s.label().green().to_string(),
            s if s.is_terminal() => s.label().dimmed().to_string(),
            s => s.label().to_string(),
        };
        println!(
            "{marker} {:>2}. [{}] {} - {} ({})",
            item.seq,
            item.id,
            item.title,
            status,
            fmt_secs(item.elapsed_secs)
        );
    }
    if snapshot.items.is_empty() {
        println!("{}", "agenda is empty".dimmed());
    }
}

fn fmt_secs(secs: u64) -> String {
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

fn print_help() {
    println!("Session:  begin | suspend | resume | conclude | cancel");
    println!("Agenda:   add <section> <kind> <title...> | template <id> [replace|append]");
    println!("          start <item> | pause [item] | unpause [item]");
    println!("          move <item> up|down | move <item> to <section> <pos>");
    println!("Item:     vote open | vote <member> <yes|no|abstain> | finish [outcome]");
    println!("          withdraw <reason...> | review <member> | unreview [item]");
    println!("Roll:     present <member> [on|off] [justification...] | roster");
    println!("Info:     status | quorum | tally [item] | elapsed | help | quit");
}
