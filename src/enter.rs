//! Entering contestants for a contest from the command line.

use {
    std::{
        io,
        path::Path,
    },
    tokio::io::{
        AsyncBufReadExt as _,
        BufReader,
        stdin,
    },
    crate::{
        api::{
            self,
            Backend,
        },
        config::PageConfig,
        contestant::{
            Controller,
            form::{
                ContestantForm,
                Field,
                FormId,
            },
        },
        id::{
            Contests,
            Id,
        },
        lang::Toast,
        prelude::*,
    },
};

#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error(transparent)] Api(#[from] api::Error),
    #[error(transparent)] Csv(#[from] csv::Error),
    #[error(transparent)] Io(#[from] io::Error),
    #[error("unknown column {0:?} in imported file")]
    UnknownColumn(String),
    #[error("column {0:?} in imported file is not part of this contest's form")]
    ColumnNotInForm(String),
    #[error("this contest takes a single contestant but the imported file has {0} rows")]
    TooManyRows(usize),
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum CommandParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("missing argument")]
    MissingArgument,
    #[error(transparent)] FormId(#[from] std::num::ParseIntError),
}

/// A line typed on the entry prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Set(Field, String),
    Next,
    Open(FormId),
    Show,
    Html,
    Submit,
    Quit,
}

impl FromStr for Command {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (command, rest) = s.trim().split_once(char::is_whitespace).unwrap_or((s.trim(), ""));
        Ok(match command {
            "" => return Err(CommandParseError::Empty),
            "set" => {
                let (field, value) = rest.trim_start().split_once(char::is_whitespace).unwrap_or((rest.trim_start(), ""));
                if field.is_empty() { return Err(CommandParseError::MissingArgument) }
                let field = Field::from_name(field).ok_or_else(|| CommandParseError::UnknownField(field.to_owned()))?;
                Self::Set(field, value.trim().to_owned())
            }
            "next" => Self::Next,
            "open" => if rest.trim().is_empty() { return Err(CommandParseError::MissingArgument) } else { Self::Open(FormId(rest.trim().parse()?)) },
            "show" => Self::Show,
            "html" => Self::Html,
            "submit" => Self::Submit,
            "quit" | "exit" => Self::Quit,
            _ => return Err(CommandParseError::Unknown(command.to_owned())),
        })
    }
}

/// What the prompt should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Outcome {
    Continue(Vec<String>),
    Submitted,
    Quit,
}

/// Result of reading a CSV file into the formset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Imported {
    pub(crate) confirmed: usize,
    /// The 1-based row that failed validation. Its values stay in the visible form, annotated, and later rows are skipped.
    pub(crate) invalid_row: Option<usize>,
}

/// Fills one form per row of a CSV file whose headers are field names, confirming each filled form.
///
/// The file is checked as a whole before any form is touched, so an `Err` leaves the controller unchanged.
pub(crate) fn import(controller: &mut Controller, individual: bool, reader: impl io::Read) -> Result<Imported, Error> {
    let mut reader = csv::Reader::from_reader(reader);
    let layout = controller.form(controller.visible_form()).map(|form| form.fields().collect_vec()).unwrap_or_default();
    let columns = reader.headers()?.iter().map(|column| {
        let field = Field::from_name(column).ok_or_else(|| Error::UnknownColumn(column.to_owned()))?;
        if layout.contains(&field) { Ok(field) } else { Err(Error::ColumnNotInForm(column.to_owned())) }
    }).collect::<Result<Vec<_>, _>>()?;
    let records = reader.records().collect::<Result<Vec<_>, _>>()?;
    if individual && records.len() > 1 { return Err(Error::TooManyRows(records.len())) }
    let mut imported = Imported { confirmed: 0, invalid_row: None };
    for (idx, record) in records.iter().enumerate() {
        for (&field, value) in columns.iter().zip(record) {
            controller.set_value(field, value.trim());
        }
        let confirmed = if individual { controller.validate_form(None) } else { controller.add_next_contestant() };
        if confirmed {
            imported.confirmed += 1;
        } else {
            imported.invalid_row = Some(idx + 1);
            break
        }
    }
    Ok(imported)
}

pub(crate) fn import_file(controller: &mut Controller, individual: bool, path: &Path) -> Result<Imported, Error> {
    import(controller, individual, std::fs::File::open(path)?)
}

fn describe_field(form: &ContestantForm, field: Field) -> String {
    match form.state(field).error() {
        Some(error) => format!("{}: {:?} ({error})", field.name(), form.value(field)),
        None => format!("{}: {:?}", field.name(), form.value(field)),
    }
}

/// A plain-text summary of the visible form, one line per input with its error if any.
pub(crate) fn describe_visible(controller: &Controller) -> Vec<String> {
    let visible = controller.visible_form();
    let Some(form) = controller.form(visible) else { return Vec::default() };
    let mut lines = vec![format!("formularz {visible} z {}", controller.total_forms())];
    lines.extend(form.fields().map(|field| describe_field(form, field)));
    if !controller.previews().is_empty() {
        lines.push(format!("zapisani: {}", controller.previews().iter().map(|chip| format!("[{}] {}", chip.form, chip.label)).join(", ")));
    }
    lines
}

/// Only the inputs of the visible form that failed validation.
pub(crate) fn describe_errors(controller: &Controller) -> Vec<String> {
    let Some(form) = controller.form(controller.visible_form()) else { return Vec::default() };
    form.fields().filter(|&field| form.state(field).error().is_some()).map(|field| describe_field(form, field)).collect()
}

pub(crate) async fn apply(backend: &dyn Backend, contest: Id<Contests>, controller: &mut Controller, command: Command) -> Outcome {
    match command {
        Command::Set(field, value) => Outcome::Continue(if controller.set_value(field, value) {
            Vec::default()
        } else {
            vec![format!("ten formularz nie ma pola {}", field.name())]
        }),
        Command::Next => {
            let mut lines = Vec::default();
            if !controller.add_next_contestant() {
                lines.push(format!("nie można dodać kolejnego zawodnika"));
            }
            if controller.take_scroll_to_top() {
                lines.extend(describe_visible(controller));
            } else {
                lines.extend(describe_errors(controller));
            }
            Outcome::Continue(lines)
        }
        Command::Open(target) => Outcome::Continue(if controller.load_cached_contestant(target) {
            describe_visible(controller)
        } else {
            vec![format!("nie można otworzyć formularza {target}")]
        }),
        Command::Show => Outcome::Continue(describe_visible(controller)),
        Command::Html => Outcome::Continue(vec![controller.render().0]),
        Command::Submit => {
            let Some(formset) = controller.submission() else {
                return Outcome::Continue(describe_visible(controller))
            };
            match backend.add_contestants(contest, formset).await {
                Ok(()) => {
                    log::info!("submitted {} contestants for contest {contest}", controller.previews().len());
                    Outcome::Submitted
                }
                Err(e) => {
                    log::warn!("failed to submit contestants for contest {contest}: {e}");
                    Outcome::Continue(vec![Toast::request_failed().to_string()])
                }
            }
        }
        Command::Quit => Outcome::Quit,
    }
}

/// Loads the contest, imports `import_path` if given, then reads commands from stdin until the formset is submitted.
pub(crate) async fn run(backend: &dyn Backend, contest: Id<Contests>, import_path: Option<&Path>, individual: bool) -> Result<(), Error> {
    let info = backend.contest(contest).await?;
    let config = PageConfig::for_contest(info.age_range, individual);
    let mut controller = Controller::new(&config);
    println!("{}", info.name);
    if let Some(path) = import_path {
        let imported = import_file(&mut controller, individual, path)?;
        log::info!("imported {} contestants from {}", imported.confirmed, path.display());
        if let Some(row) = imported.invalid_row {
            eprintln!("wiersz {row} zawiera błędy, popraw formularz i wpisz next");
        }
    }
    for line in describe_visible(&controller) {
        println!("{line}");
    }
    let mut lines = BufReader::new(stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(CommandParseError::Empty) => continue,
            Err(e) => {
                eprintln!("{e}");
                continue
            }
        };
        match apply(backend, contest, &mut controller, command).await {
            Outcome::Continue(output) => for line in output {
                println!("{line}");
            },
            Outcome::Submitted => {
                println!("wysłano zgłoszenie");
                break
            }
            Outcome::Quit => break,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use {
        crate::{
            api::AgeRange,
            test_util::MockBackend,
        },
        super::*,
    };

    fn controller(individual: bool) -> Controller {
        Controller::new(&PageConfig::for_contest(AgeRange::Years { lowest_year: 2004, highest_year: 2008 }, individual))
    }

    const ROWS: &str = "first_name,last_name,gender,year_of_birth,school,styles_distances
Anna,Nowak,F,2006,SP 3,Dowolny 50m
Jan,Kowalski,M,2005,SP 3,Grzbietowy 50m
";

    #[test]
    fn parses_commands() {
        assert_eq!("set first_name Anna Maria".parse::<Command>().unwrap(), Command::Set(Field::FirstName, format!("Anna Maria")));
        assert_eq!("set school".parse::<Command>().unwrap(), Command::Set(Field::School, String::new()));
        assert_eq!("  open 2 ".parse::<Command>().unwrap(), Command::Open(FormId(2)));
        assert_eq!("next".parse::<Command>().unwrap(), Command::Next);
        assert!(matches!("set club x".parse::<Command>(), Err(CommandParseError::UnknownField(_))));
        assert!(matches!("open".parse::<Command>(), Err(CommandParseError::MissingArgument)));
        assert!(matches!("".parse::<Command>(), Err(CommandParseError::Empty)));
        assert!(matches!("dance".parse::<Command>(), Err(CommandParseError::Unknown(_))));
    }

    #[test]
    fn imports_one_form_per_row() {
        let mut controller = controller(false);
        assert_eq!(import(&mut controller, false, ROWS.as_bytes()).unwrap(), Imported { confirmed: 2, invalid_row: None });
        assert_eq!(controller.previews().len(), 2);
        assert_eq!(controller.total_forms(), 3);
        assert_eq!(controller.visible_form(), FormId(2));
    }

    #[tokio::test]
    async fn invalid_row_can_be_corrected() {
        let backend = MockBackend::default();
        let contest = Id::from(1_u64);
        let mut controller = controller(false);
        let rows = "first_name,last_name,gender,year_of_birth,school,styles_distances
Anna,Nowak,F,1990,SP 3,Dowolny 50m
Jan,Kowalski,M,2005,SP 3,Grzbietowy 50m
";
        assert_eq!(import(&mut controller, false, rows.as_bytes()).unwrap(), Imported { confirmed: 0, invalid_row: Some(1) });
        assert_eq!(controller.previews().len(), 0);
        assert_eq!(describe_errors(&controller), vec![format!("year_of_birth: \"1990\" (Zawodnik nie mieści się w wymaganym przedziale wiekowym.)")]);
        assert_eq!(apply(&backend, contest, &mut controller, "set year_of_birth 2006".parse().unwrap()).await, Outcome::Continue(Vec::default()));
        let Outcome::Continue(lines) = apply(&backend, contest, &mut controller, Command::Next).await else { panic!("unexpected outcome") };
        assert_eq!(lines.first().map(String::as_str), Some("formularz 1 z 2"));
        assert_eq!(controller.previews().len(), 1);
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn import_rejects_unknown_columns() {
        let mut controller = controller(false);
        assert!(matches!(import(&mut controller, false, "club\nx\n".as_bytes()), Err(Error::UnknownColumn(_))));
    }

    #[test]
    fn import_rejects_columns_outside_the_form() {
        let mut controller = controller(false);
        let rows = "first_name,last_name,gender,age,school,styles_distances\nAnna,Nowak,F,12,SP 3,Dowolny 50m\n";
        assert!(matches!(import(&mut controller, false, rows.as_bytes()), Err(Error::ColumnNotInForm(column)) if column == "age"));
        assert_eq!(controller.total_forms(), 1);
        assert!(controller.form(FormId(0)).is_some_and(ContestantForm::is_blank));
    }

    #[tokio::test]
    async fn failed_next_lists_only_errors() {
        let backend = MockBackend::default();
        let contest = Id::from(1_u64);
        let mut controller = controller(false);
        apply(&backend, contest, &mut controller, Command::Set(Field::School, format!("SP (3)"))).await;
        let Outcome::Continue(lines) = apply(&backend, contest, &mut controller, Command::Next).await else { panic!("unexpected outcome") };
        assert_eq!(lines[0], "nie można dodać kolejnego zawodnika");
        assert!(lines.iter().any(|line| line.starts_with("first_name")));
        assert!(!lines.iter().any(|line| line.starts_with("school")));
    }

    #[test]
    fn individual_import_takes_one_row() {
        let mut controller = controller(true);
        assert!(matches!(import(&mut controller, true, ROWS.as_bytes()), Err(Error::TooManyRows(2))));
        assert!(controller.form(FormId(0)).is_some_and(ContestantForm::is_blank));
    }

    #[tokio::test]
    async fn individual_entry_submits_single_form() {
        let backend = MockBackend::default();
        let mut controller = controller(true);
        let row = "first_name,last_name,gender,year_of_birth\nAnna,Nowak,F,2006\n";
        assert_eq!(import(&mut controller, true, row.as_bytes()).unwrap(), Imported { confirmed: 1, invalid_row: None });
        assert_eq!(apply(&backend, Id::from(1_u64), &mut controller, Command::Submit).await, Outcome::Submitted);
        assert_eq!(controller.previews().len(), 1);
        assert_eq!(controller.total_forms(), 1);
        let submitted = backend.submitted();
        assert!(submitted[0].contains(&(format!("form-TOTAL_FORMS"), format!("1"))));
        assert!(!submitted[0].iter().any(|(name, _)| name.starts_with("form-1-")));
    }

    #[tokio::test]
    async fn submits_imported_contestants() {
        let backend = MockBackend::default();
        let contest = Id::from(1_u64);
        let mut controller = controller(false);
        import(&mut controller, false, ROWS.as_bytes()).unwrap();
        assert_eq!(apply(&backend, contest, &mut controller, Command::Submit).await, Outcome::Submitted);
        assert_eq!(backend.calls(), vec![format!("POST /zawody/1/zawodnicy/dodaj")]);
        let submitted = backend.submitted();
        assert!(submitted[0].contains(&(format!("form-TOTAL_FORMS"), format!("2"))));
        assert!(submitted[0].contains(&(format!("form-1-first_name"), format!("Jan"))));
    }

    #[tokio::test]
    async fn invalid_visible_form_blocks_submission() {
        let backend = MockBackend::default();
        let mut controller = controller(false);
        apply(&backend, Id::from(1_u64), &mut controller, Command::Set(Field::FirstName, format!("Anna"))).await;
        let Outcome::Continue(lines) = apply(&backend, Id::from(1_u64), &mut controller, Command::Submit).await else { panic!("submitted an invalid form") };
        assert!(lines.iter().any(|line| line.starts_with("last_name")));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn failed_submission_shows_toast() {
        let backend = MockBackend::failing();
        let mut controller = controller(false);
        import(&mut controller, false, ROWS.as_bytes()).unwrap();
        assert_eq!(apply(&backend, Id::from(1_u64), &mut controller, Command::Submit).await, Outcome::Continue(vec![format!("Ups... wystąpił problem")]));
    }

    #[tokio::test]
    async fn open_switches_forms() {
        let backend = MockBackend::default();
        let mut controller = controller(false);
        import(&mut controller, false, ROWS.as_bytes()).unwrap();
        let Outcome::Continue(lines) = apply(&backend, Id::from(1_u64), &mut controller, Command::Open(FormId(0))).await else { panic!("unexpected outcome") };
        assert_eq!(controller.visible_form(), FormId(0));
        assert_eq!(controller.total_forms(), 2);
        assert!(lines.iter().any(|line| line.contains("\"Anna\"")));
    }
}
