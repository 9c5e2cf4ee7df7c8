use std::fmt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use buzzer::command::{self, Command};
use buzzer::{Buzzer, Config, Desk, DeskClosed};

const BANNER: &str = "
Welcome to the simple service-queue interactive program

   An empty service queue has been created for you
   Commands:
    d          : display queue
    l          : report length of queue
    g          : give out a buzzer
    s          : serve the first buzzer in line
    k <buzzer> : kick specified buzzer out!
    b <buzzer> : take a bribe to move specified buzzer to front!
    q          : quit
-----------------------------------

";

#[derive(Debug, PartialEq, Eq)]
enum Reply {
    Line(Vec<Buzzer>),
    Length(usize),
    Buzzer(Buzzer),
    Seated(Option<Buzzer>),
    KickedOut(i64, bool),
    Bribed(bool),
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Reply::Line(line) => {
                write!(f, "[ ")?;
                for b in line {
                    write!(f, "{} ", b)?;
                }
                write!(f, "] ")
            }
            Reply::Length(n) => write!(f, "len: {}", n),
            Reply::Buzzer(b) => write!(f, "buzzer: {}", b),
            Reply::Seated(Some(b)) => write!(f, "seating buzzer: {}", b),
            Reply::Seated(None) => write!(f, "sorry, queue is empty"),
            Reply::KickedOut(b, true) => write!(f, "{} is outta here!", b),
            Reply::KickedOut(b, false) => write!(f, "could not remove tkt {}!", b),
            Reply::Bribed(true) => write!(f, "VIP coming through!"),
            Reply::Bribed(false) => write!(f, "Get in line, then bribe me!"),
        }
    }
}

/// Forwards `cmd` to the desk. `None` means the session should end.
async fn dispatch(desk: &Desk, cmd: Command) -> Result<Option<Reply>, DeskClosed> {
    let reply = match cmd {
        Command::Display => Reply::Line(desk.display().await?),
        Command::Length => Reply::Length(desk.length().await?),
        Command::GiveBuzzer => Reply::Buzzer(desk.give_buzzer().await?),
        Command::Seat => Reply::Seated(desk.seat().await?),
        Command::KickOut(b) => Reply::KickedOut(b, desk.kick_out(b).await?),
        Command::TakeBribe(b) => Reply::Bribed(desk.take_bribe(b).await?),
        Command::Quit => return Ok(None),
    };
    Ok(Some(reply))
}

/// Reads commands line by line until `q` or end of input.
pub async fn run<R, W>(desk: &Desk, config: &Config, mut input: R, mut output: W) -> buzzer::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    if config.banner {
        output.write_all(BANNER.as_bytes()).await?;
    }

    let mut buf = Vec::new();
    loop {
        output.write_all(config.prompt.as_bytes()).await?;
        output.flush().await?;

        buf.clear();
        if input.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        // invalid UTF-8 decodes to replacement chars, which never parse
        let line = String::from_utf8_lossy(&buf);

        let cmd = match command::parse(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                debug!(%e, "rejected input");
                output.write_all(b"    bad command. try again\n").await?;
                continue;
            }
        };

        match dispatch(desk, cmd).await? {
            Some(reply) => output.write_all(format!("  {}\n", reply).as_bytes()).await?,
            None => {
                output.write_all(b"  goodbye...\n").await?;
                break;
            }
        }
    }

    output.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet() -> Config {
        Config {
            prompt: String::new(),
            banner: false,
            ..Config::default()
        }
    }

    async fn transcript(config: &Config, input: &str) -> String {
        let desk = Desk::new("test".into(), 4);
        let mut out = Vec::new();
        run(&desk, config, input.as_bytes(), &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn runs_a_session() {
        let out = transcript(&quiet(), "g\ng\ng\ns\ng\nd\nl\nq\ng\n").await;
        assert_eq!(
            out,
            "  buzzer: 0\n  buzzer: 1\n  buzzer: 2\n  seating buzzer: 0\n  buzzer: 0\n  [ 1 2 0 ] \n  len: 3\n  goodbye...\n"
        );
    }

    #[tokio::test]
    async fn reports_failures() {
        let out = transcript(&quiet(), "s\nk 0\nb -1\ng\nk 0\nk 0\nb 0\n").await;
        assert_eq!(
            out,
            "  sorry, queue is empty\n  could not remove tkt 0!\n  Get in line, then bribe me!\n  buzzer: 0\n  0 is outta here!\n  could not remove tkt 0!\n  Get in line, then bribe me!\n"
        );
    }

    #[tokio::test]
    async fn bribe_and_bad_input() {
        let out = transcript(&quiet(), "g\ng\ng\n\nb 2\nd\nz\nd 1\nk\n").await;
        assert_eq!(
            out,
            "  buzzer: 0\n  buzzer: 1\n  buzzer: 2\n  VIP coming through!\n  [ 2 0 1 ] \n    bad command. try again\n    bad command. try again\n    bad command. try again\n"
        );
    }

    #[tokio::test]
    async fn invalid_utf8_line_is_a_bad_command() {
        let desk = Desk::new("test".into(), 4);
        let mut out = Vec::new();
        run(&desk, &quiet(), &b"g\n\xff\ng\nd\n"[..], &mut out)
            .await
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "  buzzer: 0\n    bad command. try again\n  buzzer: 1\n  [ 0 1 ] \n"
        );
    }

    #[tokio::test]
    async fn empty_display_and_last_line_without_newline() {
        let out = transcript(&quiet(), "d\ng").await;
        assert_eq!(out, "  [ ] \n  buzzer: 0\n");
    }

    #[tokio::test]
    async fn prints_banner_and_prompt() {
        let out = transcript(&Config::default(), "l\n").await;
        assert!(out.starts_with(BANNER));
        assert!(out.ends_with("cmd >   len: 0\ncmd > "));
    }
}
