//! Unit tests for console command parsing.

use ehr_access_console::console::{parse_command, ConsoleCommand};
use ehr_access_console::models::request::{ClinicalRole, TimeOfDay};
use ehr_access_console::view::Perspective;

#[test]
fn parses_form_commands() {
    assert_eq!(
        parse_command("role Doctor").unwrap(),
        ConsoleCommand::Role(ClinicalRole::Doctor)
    );
    assert_eq!(
        parse_command("time night").unwrap(),
        ConsoleCommand::Time(TimeOfDay::Nighttime)
    );
    assert_eq!(
        parse_command("purpose   Lab Results  ").unwrap(),
        ConsoleCommand::Purpose("Lab Results".into())
    );
}

#[test]
fn location_keeps_full_label() {
    assert_eq!(
        parse_command("location Internal_IP (Hospital)").unwrap(),
        ConsoleCommand::Location("Internal_IP (Hospital)".into())
    );
    assert!(parse_command("location").is_err());
}

#[test]
fn emergency_accepts_on_off() {
    assert_eq!(parse_command("emergency on").unwrap(), ConsoleCommand::Emergency(true));
    assert_eq!(parse_command("EMERGENCY off").unwrap(), ConsoleCommand::Emergency(false));
    assert!(parse_command("emergency maybe").is_err());
}

#[test]
fn justify_without_text_clears() {
    assert_eq!(
        parse_command("justify").unwrap(),
        ConsoleCommand::Justify(String::new())
    );
}

#[test]
fn view_accepts_perspective_names() {
    assert_eq!(
        parse_command("view subject").unwrap(),
        ConsoleCommand::View(Perspective::SubjectTransparency)
    );
    assert_eq!(
        parse_command("view transparency").unwrap(),
        ConsoleCommand::View(Perspective::SubjectTransparency)
    );
    assert_eq!(
        parse_command("view requester").unwrap(),
        ConsoleCommand::View(Perspective::Requester)
    );
    assert!(parse_command("view admin").is_err());
}

#[test]
fn bare_verbs_parse() {
    assert_eq!(parse_command("submit").unwrap(), ConsoleCommand::Submit);
    assert_eq!(parse_command("refresh").unwrap(), ConsoleCommand::Refresh);
    assert_eq!(parse_command("show").unwrap(), ConsoleCommand::Show);
    assert_eq!(parse_command("?").unwrap(), ConsoleCommand::Help);
    assert_eq!(parse_command("exit").unwrap(), ConsoleCommand::Quit);
}

#[test]
fn unknown_role_is_rejected() {
    assert!(parse_command("role astronaut").is_err());
}
