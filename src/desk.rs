use nanoid::nanoid;
use std::convert::TryFrom;
use tokio::sync::{mpsc, oneshot};
use tracing::{info, instrument};
use tracing_futures::Instrument;

use crate::queue::{Buzzer, NotInQueue, ServiceQueue};

const DEFAULT_CAPACITY: usize = 100;

#[derive(Debug)]
pub enum DeskMail {
    Display(oneshot::Sender<Vec<Buzzer>>),
    Length(oneshot::Sender<usize>),
    GiveBuzzer(oneshot::Sender<Buzzer>),
    Seat(oneshot::Sender<Option<Buzzer>>),
    KickOut(Buzzer, oneshot::Sender<Result<(), NotInQueue>>),
    TakeBribe(Buzzer, oneshot::Sender<Result<(), NotInQueue>>),
}

/// The desk task has exited, so the request could not be answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeskClosed;

impl std::fmt::Display for DeskClosed {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "service desk is closed")
    }
}

impl std::error::Error for DeskClosed {}

/// Handle to a task that owns a [`ServiceQueue`]. Every request is one
/// message, so the queue sees calls strictly one at a time no matter how
/// many handles exist. The task exits once all handles are dropped.
#[derive(Clone, Debug)]
pub struct Desk {
    mail_box: mpsc::Sender<DeskMail>,
}

impl std::ops::Deref for Desk {
    type Target = mpsc::Sender<DeskMail>;

    fn deref(&self) -> &Self::Target {
        &self.mail_box
    }
}

impl Default for Desk {
    fn default() -> Self {
        Self::new(nanoid!(), DEFAULT_CAPACITY)
    }
}

impl Desk {
    #[instrument(name = "desk")]
    pub fn new(name: String, capacity: usize) -> Self {
        let (tx, mut rx) = mpsc::channel(capacity.max(1));

        info!(message = "opened", %name);
        let desk = async move {
            let mut queue = ServiceQueue::new();

            // a dropped reply channel only means the caller stopped waiting
            while let Some(mail) = rx.recv().await {
                match mail {
                    DeskMail::Display(tx) => {
                        let _ = tx.send(queue.snapshot());
                    }
                    DeskMail::Length(tx) => {
                        let _ = tx.send(queue.len());
                    }
                    DeskMail::GiveBuzzer(tx) => {
                        let _ = tx.send(queue.give_buzzer());
                    }
                    DeskMail::Seat(tx) => {
                        let _ = tx.send(queue.seat());
                    }
                    DeskMail::KickOut(b, tx) => {
                        let _ = tx.send(queue.kick_out(b));
                    }
                    DeskMail::TakeBribe(b, tx) => {
                        let _ = tx.send(queue.take_bribe(b));
                    }
                }
            }

            info!(message = "closed", %name, waiting = queue.len());
        };
        tokio::spawn(desk.in_current_span());

        Self { mail_box: tx }
    }

    pub async fn display(&self) -> Result<Vec<Buzzer>, DeskClosed> {
        self.request(DeskMail::Display).await
    }

    pub async fn length(&self) -> Result<usize, DeskClosed> {
        self.request(DeskMail::Length).await
    }

    pub async fn give_buzzer(&self) -> Result<Buzzer, DeskClosed> {
        self.request(DeskMail::GiveBuzzer).await
    }

    pub async fn seat(&self) -> Result<Option<Buzzer>, DeskClosed> {
        self.request(DeskMail::Seat).await
    }

    /// Returns `false` when `buzzer` is not waiting in line, negative
    /// values included.
    pub async fn kick_out(&self, buzzer: i64) -> Result<bool, DeskClosed> {
        let buzzer = match Buzzer::try_from(buzzer) {
            Ok(b) => b,
            Err(_) => return Ok(false),
        };
        let res = self.request(|tx| DeskMail::KickOut(buzzer, tx)).await?;
        Ok(res.is_ok())
    }

    /// Returns `false` when `buzzer` is not waiting in line, negative
    /// values included.
    pub async fn take_bribe(&self, buzzer: i64) -> Result<bool, DeskClosed> {
        let buzzer = match Buzzer::try_from(buzzer) {
            Ok(b) => b,
            Err(_) => return Ok(false),
        };
        let res = self.request(|tx| DeskMail::TakeBribe(buzzer, tx)).await?;
        Ok(res.is_ok())
    }

    async fn request<T>(
        &self,
        mail: impl FnOnce(oneshot::Sender<T>) -> DeskMail,
    ) -> Result<T, DeskClosed> {
        let (tx, rx) = oneshot::channel();
        self.mail_box.send(mail(tx)).await.map_err(|_| DeskClosed)?;
        rx.await.map_err(|_| DeskClosed)
    }
}
