use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, BufRead, Write};

use log::{debug, info};
use quiz_engine::quiz::loader::load_quiz;
use quiz_engine::quiz::{
    DisplayPlan, Question, QuestionKind, Quiz, QuizResults, QuizSession, UserResponse,
};
use quiz_engine::Config;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

const HELP_TEXT: &str =
    "Commands: :hint shows a hint, :back and :skip move between questions, :quit ends the quiz.";
const INVALID_ANSWER: &str = "That answer doesn't fit this question, please try again.";

fn main() -> HandlerResult {
    pretty_env_logger::init();

    let config = Config::from_env().with_quiz_file(std::env::args().nth(1));
    info!("Starting quiz runner with {:?}", config);

    let quiz = load_quiz(&config.quiz_file)?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let stdin = io::stdin();
    let mut console = Console {
        input: stdin.lock(),
        output: io::stdout(),
    };

    let mut session = QuizSession::new(&quiz);
    loop {
        let results = run_quiz(&quiz, &mut session, &config, &mut rng, &mut console)?;
        print_results(&results, &mut console)?;

        match console.read("Play again? (y/n) ")? {
            Some(answer) if answer.eq_ignore_ascii_case("y") => session.restart(),
            _ => break,
        }
    }
    Ok(())
}

struct Console<R, W> {
    input: R,
    output: W,
}

enum Input {
    Line(String),
    Hint,
    Back,
    Skip,
    Quit,
}

impl<R: BufRead, W: Write> Console<R, W> {
    fn say(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{}", text)
    }

    /// `None` once the input is exhausted.
    fn read(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn ask(&mut self) -> io::Result<Input> {
        let Some(line) = self.read("> ")? else {
            return Ok(Input::Quit);
        };
        let input = match line.trim() {
            ":hint" => Input::Hint,
            ":back" => Input::Back,
            ":skip" => Input::Skip,
            ":quit" => Input::Quit,
            _ => Input::Line(line),
        };
        Ok(input)
    }
}

fn run_quiz<R: BufRead, W: Write>(
    quiz: &Quiz,
    session: &mut QuizSession,
    config: &Config,
    rng: &mut impl Rng,
    console: &mut Console<R, W>,
) -> io::Result<QuizResults> {
    console.say(&format!("\n{}", quiz.title))?;
    if !quiz.description.is_empty() {
        console.say(&quiz.description)?;
    }
    console.say(HELP_TEXT)?;

    'questions: loop {
        let index = session.current();
        let Some(question) = quiz.questions.get(index) else {
            break;
        };
        let plan = session.present(quiz, rng);

        console.say(&format!(
            "\nQuestion {}/{}: {}",
            index + 1,
            session.total(),
            question.text
        ))?;
        render(&plan, question, console)?;

        let response = loop {
            match console.ask()? {
                Input::Hint => {
                    let hint = session.hint(quiz).unwrap_or("No hint for this one.");
                    console.say(hint)?;
                }
                Input::Back => {
                    if !session.previous() {
                        console.say("This is the first question.")?;
                        continue;
                    }
                    break None;
                }
                Input::Skip => {
                    if !session.next() {
                        break 'questions;
                    }
                    break None;
                }
                Input::Quit => break 'questions,
                Input::Line(line) => match parse_response(&plan, question, &line) {
                    Some(response) => break Some(response),
                    None => console.say(INVALID_ANSWER)?,
                },
            }
        };

        let Some(response) = response else {
            continue;
        };
        debug!("question {}: {:?}", index, response);

        let submission = session.submit(quiz, response);
        console.say(if submission.correct {
            "Correct!"
        } else {
            "Not quite."
        })?;
        if !submission.counted {
            console.say("(Only your first answer counts towards the score.)")?;
        }
        if config.show_explanations {
            if let Some(explanation) = &question.explanation {
                console.say(explanation)?;
            }
        }

        if !session.next() {
            break;
        }
    }

    Ok(session.finish(quiz))
}

fn render<R: BufRead, W: Write>(
    plan: &DisplayPlan,
    question: &Question,
    console: &mut Console<R, W>,
) -> io::Result<()> {
    match (plan, &question.kind) {
        (
            DisplayPlan::Choices { order, multiple },
            QuestionKind::MultipleChoice { choices, .. } | QuestionKind::MultipleAnswer { choices, .. },
        ) => {
            for (shown, canonical) in order.iter().enumerate() {
                let text = choices.get(*canonical).map(String::as_str).unwrap_or("");
                console.say(&format!("  {}. {}", shown + 1, text))?;
            }
            if *multiple {
                console.say("Pick every correct option, separated by commas.")?;
            }
        }
        (DisplayPlan::TrueFalse { .. }, _) => {
            if let Some(order) = plan.true_false_order() {
                for (shown, value) in order.iter().enumerate() {
                    console.say(&format!("  {}. {}", shown + 1, if *value { "True" } else { "False" }))?;
                }
            }
        }
        (DisplayPlan::Matching { items, matches }, QuestionKind::Matching { items: item_text, matches: match_text, .. }) => {
            console.say("Items:")?;
            for (shown, entry) in items.iter().enumerate() {
                console.say(&format!("  {}. {}", item_letter(shown), entry.label(item_text).unwrap_or("")))?;
            }
            console.say("Targets:")?;
            for (shown, entry) in matches.iter().enumerate() {
                console.say(&format!("  {}. {}", shown + 1, entry.label(match_text).unwrap_or("")))?;
            }
            console.say("Pair them as target=item, e.g. 1=b, 2=a.")?;
        }
        (DisplayPlan::Enumeration { slots }, _) => {
            console.say(&format!("Give up to {} answers separated by ';'.", slots))?;
        }
        (DisplayPlan::FreeText, _) => {
            console.say("Type your answer.")?;
        }
        _ => {
            console.say("This question can't be answered here, use :skip to move on.")?;
        }
    }
    Ok(())
}

/// Turns a typed line into a canonical response using the plan that was
/// shown. `None` means the line doesn't fit the question.
fn parse_response(plan: &DisplayPlan, question: &Question, line: &str) -> Option<UserResponse> {
    let line = line.trim();
    match plan {
        DisplayPlan::Choices { multiple: false, .. } => {
            let shown = parse_position(line)?;
            plan.canonical_choice(shown).map(UserResponse::Choice)
        }
        DisplayPlan::Choices { multiple: true, .. } => {
            let selected = line
                .split(',')
                .map(|part| parse_position(part).and_then(|shown| plan.canonical_choice(shown)))
                .collect::<Option<BTreeSet<usize>>>()?;
            Some(UserResponse::Choices(selected))
        }
        DisplayPlan::TrueFalse { .. } => {
            let value = match line.to_lowercase().as_str() {
                "true" | "t" => Some(true),
                "false" | "f" => Some(false),
                _ => parse_position(line).and_then(|shown| plan.true_false_value(shown)),
            }?;
            Some(UserResponse::Bool(value))
        }
        DisplayPlan::Matching { items, matches } => {
            let QuestionKind::Matching {
                items: item_text,
                matches: match_text,
                ..
            } = &question.kind
            else {
                return None;
            };
            let mut pairs = BTreeMap::new();
            for pair in line.split(',').filter(|p| !p.trim().is_empty()) {
                let (target, item) = pair.split_once('=')?;
                let target = matches.get(parse_position(target)?)?;
                let item = items.get(parse_letter(item)?)?;
                pairs.insert(
                    target.label(match_text)?.to_string(),
                    item.label(item_text)?.to_string(),
                );
            }
            if pairs.is_empty() {
                return None;
            }
            Some(UserResponse::Pairs(pairs))
        }
        DisplayPlan::Enumeration { .. } => {
            let answers: Vec<String> = line
                .split(';')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(String::from)
                .collect();
            Some(UserResponse::List(answers))
        }
        DisplayPlan::FreeText => Some(UserResponse::Text(line.to_string())),
        DisplayPlan::NoInput => None,
    }
}

/// 1-based number on screen to 0-based display position.
fn parse_position(text: &str) -> Option<usize> {
    text.trim().parse::<usize>().ok()?.checked_sub(1)
}

fn item_letter(shown: usize) -> char {
    (b'a' + (shown % 26) as u8) as char
}

fn parse_letter(text: &str) -> Option<usize> {
    let mut chars = text.trim().chars();
    let letter = chars.next()?.to_ascii_lowercase();
    if chars.next().is_some() || !letter.is_ascii_lowercase() {
        return None;
    }
    Some((letter as u8 - b'a') as usize)
}

fn print_results<R: BufRead, W: Write>(
    results: &QuizResults,
    console: &mut Console<R, W>,
) -> io::Result<()> {
    console.say(&format!(
        "\n{} finished! You answered {} of {} questions correctly ({:.0}%).",
        results.title,
        results.score,
        results.total,
        results.percentage()
    ))?;
    for review in &results.reviews {
        let mark = match review.correct {
            Some(true) => "correct",
            Some(false) => "wrong",
            None => "unanswered",
        };
        console.say(&format!("  {}. {} [{}]", review.index + 1, review.text, mark))?;
    }
    Ok(())
}
