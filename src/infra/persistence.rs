use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc as std_mpsc;
use std::sync::{Arc, Mutex};
use std::thread;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{error, warn};

use crate::domain::{HandId, TableId};
use crate::engine::game_loop::{HandOutcome, HandVoided};

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("ошибка ввода-вывода архива: {0}")]
    Io(#[from] std::io::Error),
    #[error("ошибка сериализации раздачи: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("архив недоступен: мьютекс отравлен")]
    Poisoned,
    #[error("поток записи архива остановлен")]
    WriterGone,
}

/// Запись архива: раздачи не удаляются, только дописываются.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ArchivedHand {
    Finished(HandOutcome),
    Voided(HandVoided),
}

impl ArchivedHand {
    pub fn table_id(&self) -> TableId {
        match self {
            ArchivedHand::Finished(o) => o.table_id,
            ArchivedHand::Voided(v) => v.table_id,
        }
    }

    pub fn hand_id(&self) -> HandId {
        match self {
            ArchivedHand::Finished(o) => o.hand_id,
            ArchivedHand::Voided(v) => v.hand_id,
        }
    }
}

/// Абстракция хранилища истории раздач для аудита.
pub trait HandArchive: Send {
    fn record(&mut self, hand: ArchivedHand) -> Result<(), ArchiveError>;

    /// Сбросить буферы (вызывается при закрытии стола).
    fn flush(&mut self) -> Result<(), ArchiveError>;
}

/// In-memory архив. Клоны делят одно хранилище, так что тест может
/// отдать клон актору стола и потом прочитать записи.
#[derive(Clone, Debug, Default)]
pub struct InMemoryHandArchive {
    records: Arc<Mutex<Vec<ArchivedHand>>>,
}

impl InMemoryHandArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<ArchivedHand> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl HandArchive for InMemoryHandArchive {
    fn record(&mut self, hand: ArchivedHand) -> Result<(), ArchiveError> {
        self.records
            .lock()
            .map_err(|_| ArchiveError::Poisoned)?
            .push(hand);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ArchiveError> {
        Ok(())
    }
}

/// Команда потоку-писателю.
#[derive(Debug)]
enum WriteCmd {
    /// Готовая строка JSON без перевода строки.
    Line(String),
    Flush(std_mpsc::Sender<Result<(), ArchiveError>>),
}

/// JSON-lines файл: одна раздача на строку, файл только дописывается.
///
/// На диск пишет отдельный поток; `record` только сериализует раздачу
/// и ставит строку в очередь. Клоны пишут в тот же файл, так что
/// один архив раздаётся всем столам без общей блокировки.
#[derive(Clone, Debug)]
pub struct JsonLinesArchive {
    path: PathBuf,
    queue: mpsc::UnboundedSender<WriteCmd>,
}

impl JsonLinesArchive {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ArchiveError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let (queue, rx) = mpsc::unbounded_channel();
        thread::Builder::new()
            .name("hand-archive".into())
            .spawn(move || write_loop(BufWriter::new(file), rx))?;
        Ok(Self { path, queue })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HandArchive for JsonLinesArchive {
    fn record(&mut self, hand: ArchivedHand) -> Result<(), ArchiveError> {
        let line = serde_json::to_string(&hand)?;
        self.queue
            .send(WriteCmd::Line(line))
            .map_err(|_| ArchiveError::WriterGone)
    }

    /// Дождаться, пока писатель сбросит всё, что было поставлено до вызова.
    fn flush(&mut self) -> Result<(), ArchiveError> {
        let (ack, done) = std_mpsc::channel();
        self.queue
            .send(WriteCmd::Flush(ack))
            .map_err(|_| ArchiveError::WriterGone)?;
        done.recv().map_err(|_| ArchiveError::WriterGone)?
    }
}

fn write_loop(mut writer: BufWriter<File>, mut rx: mpsc::UnboundedReceiver<WriteCmd>) {
    while let Some(cmd) = rx.blocking_recv() {
        match cmd {
            WriteCmd::Line(line) => {
                let written = writer
                    .write_all(line.as_bytes())
                    .and_then(|_| writer.write_all(b"\n"));
                if let Err(err) = written {
                    error!(error = %err, "failed to append archived hand");
                }
            }
            WriteCmd::Flush(ack) => {
                let _ = ack.send(writer.flush().map_err(ArchiveError::from));
            }
        }
    }
    // Все клоны архива закрыты.
    if let Err(err) = writer.flush() {
        warn!(error = %err, "final archive flush failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::game_loop::HandVoided;

    fn voided(table_id: TableId, hand_id: HandId) -> ArchivedHand {
        ArchivedHand::Voided(HandVoided {
            table_id,
            hand_id,
            reason: "test".into(),
            restored_stacks: Vec::new(),
            log: Vec::new(),
        })
    }

    #[test]
    fn clones_append_to_one_file_through_the_writer() {
        let path = std::env::temp_dir().join(format!("hand-archive-{}.jsonl", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let mut first = JsonLinesArchive::open(&path).unwrap();
        let mut second = first.clone();
        first.record(voided(1, 1)).unwrap();
        second.record(voided(2, 1)).unwrap();
        first.record(voided(1, 2)).unwrap();
        second.flush().unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let hands: Vec<ArchivedHand> = raw
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        let ids: Vec<(TableId, HandId)> = hands.iter().map(|h| (h.table_id(), h.hand_id())).collect();
        assert_eq!(ids, vec![(1, 1), (2, 1), (1, 2)]);

        let _ = std::fs::remove_file(&path);
    }
}
