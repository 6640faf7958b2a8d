//! Terminal driver for the wizard

use std::path::PathBuf;

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, warn};

use crate::domain::{KEY_RESULT_COUNT, VisionCategory, WeekDay, or_placeholder};
use crate::wizard::{CalendarStatus, Stage, WizardController, WizardError};

/// One line of user input, parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Text(String),
    Help,
    Quit,
    Reset,
    Show,
    Goto(Stage),
    Dismiss,
    ExtractOkr,
    Next,
    Answer,
    Submit,
    Plan,
    Refresh,
    Feedback,
    Rate { rating: u8, comment: Option<String> },
    Unknown(String),
}

/// Parse a line; anything not starting with `/` is free text
pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    let Some(command) = line.strip_prefix('/') else {
        return Input::Text(line.to_string());
    };
    let (name, rest) = command.split_once(char::is_whitespace).unwrap_or((command, ""));
    let rest = rest.trim();

    match name {
        "help" | "h" => Input::Help,
        "quit" | "q" | "exit" => Input::Quit,
        "reset" => Input::Reset,
        "show" | "s" => Input::Show,
        "goto" | "g" => match rest.parse::<u8>().ok().and_then(Stage::from_number) {
            Some(stage) => Input::Goto(stage),
            None => Input::Unknown(line.to_string()),
        },
        "dismiss" => Input::Dismiss,
        "okr" => Input::ExtractOkr,
        "next" => Input::Next,
        "answer" => Input::Answer,
        "submit" => Input::Submit,
        "plan" => Input::Plan,
        "refresh" => Input::Refresh,
        "feedback" => Input::Feedback,
        "rate" => {
            let (rating, comment) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            match rating.parse::<u8>() {
                Ok(rating) => Input::Rate {
                    rating,
                    comment: Some(comment.trim()).filter(|c| !c.is_empty()).map(str::to_string),
                },
                Err(_) => Input::Unknown(line.to_string()),
            }
        }
        _ => Input::Unknown(line.to_string()),
    }
}

enum Flow {
    Continue,
    Quit,
}

/// Interactive wizard session
pub struct Console {
    wizard: WizardController,
    state_file: Option<PathBuf>,
}

impl Console {
    pub fn new(wizard: WizardController, state_file: Option<PathBuf>) -> Self {
        Self { wizard, state_file }
    }

    /// Restore saved state if present, then run until /quit or Ctrl+D
    pub async fn run(&mut self) -> Result<()> {
        if let Some(path) = &self.state_file
            && path.exists()
        {
            match self.wizard.restore(path) {
                Ok(()) => println!("{} Restored session at {}", "✓".green(), self.wizard.stage()),
                Err(e) => {
                    warn!(error = %e, "Console::run: could not restore state");
                    println!("{} Could not restore session: {}", "!".yellow(), e);
                }
            }
        }

        self.print_welcome();
        self.show();

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let prompt = format!("[{}] {} ", self.wizard.stage().number(), ">".bright_green());
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(line);

                    let input = parse_input(line);
                    debug!(?input, "Console::run: input");
                    let flow = self.handle(input, &mut rl).await;
                    self.persist();
                    if let Flow::Quit = flow {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    fn persist(&self) {
        if let Some(path) = &self.state_file
            && let Err(e) = self.wizard.save(path)
        {
            warn!(error = %e, "Console::persist: failed to save wizard state");
        }
    }

    async fn handle(&mut self, input: Input, rl: &mut DefaultEditor) -> Flow {
        let result = match input {
            Input::Quit => return Flow::Quit,
            Input::Help => {
                self.print_help();
                Ok(())
            }
            Input::Show => {
                self.show();
                Ok(())
            }
            Input::Reset => {
                self.wizard.reset();
                self.show();
                Ok(())
            }
            Input::Goto(stage) => self.wizard.navigate(stage).map(|_| self.show()),
            Input::Dismiss => {
                self.wizard.dismiss_toast();
                Ok(())
            }
            Input::Text(text) => match self.wizard.stage() {
                Stage::Coaching => self.wizard.send_message(&text).await.map(|reply| {
                    println!("{} {}", "Coach:".bright_blue(), reply);
                }),
                _ => {
                    println!("{}", "Use a / command on this screen. /help lists them.".dimmed());
                    Ok(())
                }
            },
            Input::ExtractOkr => self.wizard.extract_okr().await.map(|_| self.print_okr()),
            Input::Next => self.wizard.start_vision().map(|_| self.show()),
            Input::Answer => self.answer_questions(rl),
            Input::Submit => {
                println!("{}", "Analyzing your answers...".bright_cyan());
                self.wizard.submit_vision().await.map(|_| self.show())
            }
            Input::Plan => {
                println!("{}", "Building your week...".bright_cyan());
                self.wizard.open_weekly_plan().await.map(|_| self.show())
            }
            Input::Refresh => {
                println!("{}", "Rebuilding your week...".bright_cyan());
                self.wizard.refresh_weekly_plan().await.map(|_| self.show())
            }
            Input::Feedback => self.wizard.open_feedback().map(|_| self.show()),
            Input::Rate { rating, comment } => {
                self.wizard
                    .submit_feedback(rating, comment.as_deref())
                    .await
                    .map(|receipt| {
                        println!("{} {}", "✓".green(), receipt.message);
                        self.show();
                    })
            }
            Input::Unknown(cmd) => {
                println!("{} Unknown command: {}", "?".yellow(), cmd);
                println!("Type {} for available commands", "/help".yellow());
                Ok(())
            }
        };

        if let Err(e) = result {
            self.print_error(&e);
        }
        Flow::Continue
    }

    fn print_error(&self, err: &WizardError) {
        match (err, self.wizard.active_toast()) {
            (WizardError::Pipeline(_), Some(toast)) if toast.is_rate_limit => {
                println!("{} {}", "Rate limited:".bright_yellow(), toast.message);
            }
            (WizardError::Pipeline(_), Some(toast)) => println!("{} {}", "Error:".red(), toast.message),
            _ => println!("{} {}", "!".yellow(), err),
        }
    }

    /// Walk the vision questions; an empty line keeps the current answer
    fn answer_questions(&mut self, rl: &mut DefaultEditor) -> Result<(), WizardError> {
        if self.wizard.stage() != Stage::VisionIntake {
            return Err(WizardError::WrongStage {
                expected: Stage::VisionIntake,
                actual: self.wizard.stage(),
            });
        }
        for category in VisionCategory::ALL {
            println!();
            println!("{}", category.label().bright_cyan().bold());
            for (key, question, example) in category.questions() {
                let current = self.wizard.state().vision_answers.get(category, key).unwrap_or_default().to_string();
                println!("  {} {}", question, format!("(e.g. {})", example).dimmed());
                if !current.is_empty() {
                    println!("  {} {}", "current:".dimmed(), current);
                }
                match rl.readline("  > ") {
                    Ok(line) if !line.trim().is_empty() => {
                        self.wizard.set_vision_answer(category, key, line.trim())?;
                    }
                    Ok(_) => {}
                    Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                        println!("{}", "Stopped; answers so far are kept.".dimmed());
                        return Ok(());
                    }
                    Err(err) => {
                        warn!(error = %err, "Console::answer_questions: readline failed");
                        return Ok(());
                    }
                }
            }
        }
        println!();
        println!(
            "{} of 15 answered. Type {} to analyze.",
            self.wizard.state().vision_answers.answered(),
            "/submit".yellow()
        );
        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "OKR Coach".bright_cyan().bold());
        println!("Type {} for help, {} to quit", "/help".yellow(), "/quit".yellow());
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Anywhere:".bright_cyan());
        println!("  {:18} Show this help", "/help".yellow());
        println!("  {:18} Show the current screen", "/show".yellow());
        println!("  {:18} Go to a reached step (1 starts over)", "/goto N".yellow());
        println!("  {:18} Start over", "/reset".yellow());
        println!("  {:18} Hide the current error", "/dismiss".yellow());
        println!("  {:18} Exit", "/quit".yellow());
        println!("{}", "1. OKR Coaching:".bright_cyan());
        println!("  {:18} Talk to the coach", "<text>".yellow());
        println!("  {:18} Summarize the conversation as an OKR", "/okr".yellow());
        println!("  {:18} Continue to the life vision", "/next".yellow());
        println!("{}", "2. Life Vision:".bright_cyan());
        println!("  {:18} Answer the vision questions", "/answer".yellow());
        println!("  {:18} Analyze and build your future report", "/submit".yellow());
        println!("{}", "4. Future Report:".bright_cyan());
        println!("  {:18} Open the weekly plan", "/plan".yellow());
        println!("{}", "5. Weekly Plan:".bright_cyan());
        println!("  {:18} Generate a new plan", "/refresh".yellow());
        println!("  {:18} Leave feedback", "/feedback".yellow());
        println!("{}", "6. Feedback:".bright_cyan());
        println!("  {:18} Rate 1-5 and submit", "/rate N [comment]".yellow());
        println!();
    }

    /// Render the current stage
    fn show(&self) {
        let state = self.wizard.state();
        println!();
        let steps: Vec<String> = Stage::ALL
            .iter()
            .map(|s| {
                let label = s.number().to_string();
                if *s == state.stage {
                    label.bright_green().bold().to_string()
                } else if *s <= state.furthest {
                    label
                } else {
                    label.dimmed().to_string()
                }
            })
            .collect();
        println!("{}  {}", steps.join(" "), state.stage.to_string().bright_cyan().bold());
        println!();

        match state.stage {
            Stage::Coaching => {
                for msg in &state.messages {
                    println!("{} {}", format!("{}:", msg.role.label()).bright_blue(), msg.content);
                }
                if state.okr.is_some() {
                    self.print_okr();
                }
            }
            Stage::VisionIntake => {
                println!(
                    "{} of 15 questions answered. {} to fill them in, {} to analyze.",
                    state.vision_answers.answered(),
                    "/answer".yellow(),
                    "/submit".yellow()
                );
            }
            Stage::Analyzing => println!("{}", "Analyzing...".dimmed()),
            Stage::Outcome => self.print_outcome(),
            Stage::WeeklyPlan => self.print_plan(),
            Stage::Feedback => {
                println!("How useful was this? {} to finish.", "/rate N [comment]".yellow());
            }
        }
    }

    fn print_okr(&self) {
        let state = self.wizard.state();
        let Some(okr) = &state.okr else {
            return;
        };
        println!();
        println!("{} {}", "Objective:".bright_cyan(), okr.objective);
        for (i, kr) in okr.key_results.iter().take(KEY_RESULT_COUNT).enumerate() {
            println!("  KR{} {}", i + 1, kr);
        }
        if !state.okr_summary.is_empty() {
            println!("{}", state.okr_summary.dimmed());
        }
        println!("Type {} to continue.", "/next".yellow());
    }

    fn print_outcome(&self) {
        let state = self.wizard.state();
        if let Some(persona) = &state.persona {
            println!(
                "{} {} ({}) {}",
                "Persona:".bright_cyan(),
                persona.name.bold(),
                persona.code,
                format!("{:.0}%", persona.confidence * 100.0).dimmed()
            );
            println!("  {}", persona.description);
            println!("  {}", persona.traits.join(", ").dimmed());
            if !persona.reasoning.is_empty() {
                println!("  {}", persona.reasoning);
            }
        }
        if let Some(vision) = &state.future_vision {
            println!();
            println!("{}", vision.horizons.render());
            println!();
            println!("{}", vision.narrative);
            println!();
            println!("{}", "This week:".bright_cyan());
            for (i, task) in vision.action_tasks.iter().enumerate() {
                println!("  {}. {}", i + 1, task);
            }
        }
        println!();
        println!("Type {} for your weekly plan.", "/plan".yellow());
    }

    fn print_plan(&self) {
        let state = self.wizard.state();
        match &state.calendar_status {
            CalendarStatus::Loaded { events } => println!("{}", format!("{} calendar events considered", events).dimmed()),
            CalendarStatus::Unavailable { reason } => {
                println!("{}", format!("Calendar unavailable ({}); planned without it", reason).dimmed())
            }
            CalendarStatus::NotFetched => {}
        }
        let Some(plan) = &state.weekly_plan else {
            println!("No plan yet. Type {} to generate one.", "/refresh".yellow());
            return;
        };
        println!("{} {}", "Theme:".bright_cyan(), plan.weekly_theme.bold());
        for day in WeekDay::ALL {
            let d = plan.day(day);
            println!();
            println!("{} {}", format!("{}:", day).bright_cyan(), or_placeholder(&d.focus, "-"));
            for task in &d.tasks {
                println!("  {:6} {} {}", task.time, task.task, format!("[{}]", task.category).dimmed());
            }
            if !d.tip.is_empty() {
                println!("  {}", d.tip.dimmed());
            }
        }
        println!();
        println!("{}", plan.weekly_insight);
        if let Some(at) = state.plan_generated_at {
            println!("{}", format!("Generated {}", at.format("%Y-%m-%d %H:%M UTC")).dimmed());
        }
        println!("{} for a new plan, {} when done.", "/refresh".yellow(), "/feedback".yellow());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_text() {
        assert_eq!(parse_input("  I want to grow  "), Input::Text("I want to grow".to_string()));
    }

    #[test]
    fn test_goto() {
        assert_eq!(parse_input("/goto 4"), Input::Goto(Stage::Outcome));
        assert_eq!(parse_input("/g 1"), Input::Goto(Stage::Coaching));
        assert!(matches!(parse_input("/goto 9"), Input::Unknown(_)));
        assert!(matches!(parse_input("/goto"), Input::Unknown(_)));
    }

    #[test]
    fn test_rate() {
        assert_eq!(
            parse_input("/rate 5 very helpful"),
            Input::Rate {
                rating: 5,
                comment: Some("very helpful".to_string())
            }
        );
        assert_eq!(parse_input("/rate 3"), Input::Rate { rating: 3, comment: None });
        assert!(matches!(parse_input("/rate great"), Input::Unknown(_)));
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse_input("/q"), Input::Quit);
        assert_eq!(parse_input("/okr"), Input::ExtractOkr);
        assert_eq!(parse_input("/submit"), Input::Submit);
        assert!(matches!(parse_input("/bogus"), Input::Unknown(_)));
    }
}
