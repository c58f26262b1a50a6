//! `folio parse`, `folio render` and `folio update`.

use crate::pipeline::Session;
use crate::progress::StatusPrinter;
use crate::{BuildArgs, GlobalArgs};

/// Runs the `folio parse` command.
pub fn parse(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut session = Session::open(args, global)?;
    announce("Parsing", &session, global);

    let mut parser = session.parser()?;
    let mut printer = StatusPrinter::stderr(global.quiet, global.verbose);
    session.project.parse(&mut parser, &mut printer, args.force)?;

    Ok(exit_code(parser.error_count(), global))
}

/// Runs the `folio render` command.
pub fn render(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut session = Session::open(args, global)?;
    announce("Rendering", &session, global);

    let mut renderer = session.renderer();
    let mut printer = StatusPrinter::stderr(global.quiet, global.verbose);
    session.project.render(&mut renderer, &mut printer, args.force)?;
    Ok(0)
}

/// Runs the `folio update` command.
pub fn update(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut session = Session::open(args, global)?;
    announce("Updating", &session, global);

    let mut parser = session.parser()?;
    let mut renderer = session.renderer();
    let mut printer = StatusPrinter::stderr(global.quiet, global.verbose);
    session
        .project
        .update(&mut parser, &mut renderer, &mut printer, args.force)?;

    Ok(exit_code(parser.error_count(), global))
}

fn announce(status: &str, session: &Session, global: &GlobalArgs) {
    if global.quiet {
        return;
    }
    let versions = session.project.versions().len();
    eprintln!(
        "{status:>10} {} ({versions} version{})",
        session.config.project.name,
        if versions == 1 { "" } else { "s" }
    );
}

/// Parse errors fail the command unless `--ignore-errors` is given.
fn exit_code(errors: usize, global: &GlobalArgs) -> i32 {
    if errors == 0 || global.ignore_errors {
        return 0;
    }
    if !global.quiet {
        eprintln!("error: {errors} parse error(s), pass --ignore-errors to accept them");
    }
    1
}
