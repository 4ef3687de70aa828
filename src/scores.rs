use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const MAGIC: &[u8; 4] = b"NCS1";
pub const NUM_GAMES: usize = 5;
const SCORES_PER_GAME: usize = 3;
const TOTAL_SCORES: usize = NUM_GAMES * SCORES_PER_GAME;
pub const NAME_LEN: usize = 9;
// Each entry: 9 bytes name + 4 bytes score
const ENTRY_SIZE: usize = NAME_LEN + 4;
const FILE_SIZE: usize = 4 + TOTAL_SCORES * ENTRY_SIZE;

pub const GAME_NAMES: [&str; NUM_GAMES] = ["Breakout", "Flappy", "Shooter", "Pong", "Snake"];

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
}

impl ScoreEntry {
    fn empty() -> Self {
        ScoreEntry {
            name: String::new(),
            score: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HighScores {
    scores: Vec<Vec<ScoreEntry>>,
    path: PathBuf,
    /// Games whose finished run was already offered for entry, so a
    /// game-over screen is only prompted once
    submitted: [bool; NUM_GAMES],
}

impl HighScores {
    pub fn load() -> Self {
        Self::load_from(Self::scores_path())
    }

    /// Missing or corrupt files give an empty table.
    pub fn load_from(path: PathBuf) -> Self {
        let mut hs = HighScores {
            scores: (0..NUM_GAMES)
                .map(|_| (0..SCORES_PER_GAME).map(|_| ScoreEntry::empty()).collect())
                .collect(),
            path,
            submitted: [false; NUM_GAMES],
        };
        match fs::read(&hs.path) {
            Ok(data) => {
                if !hs.decode(&data) {
                    log::warn!("ignoring malformed score file {}", hs.path.display());
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("could not read {}: {e}", hs.path.display()),
        }
        hs
    }

    fn scores_path() -> PathBuf {
        // Store next to the executable
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                return dir.join("neoncade.scores");
            }
        }
        PathBuf::from("neoncade.scores")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn decode(&mut self, data: &[u8]) -> bool {
        if data.len() < FILE_SIZE || &data[0..4] != MAGIC {
            return false;
        }

        let mut entries = data[4..FILE_SIZE].chunks_exact(ENTRY_SIZE);
        for game in 0..NUM_GAMES {
            for slot in 0..SCORES_PER_GAME {
                let Some(raw) = entries.next() else { return false };
                let name = String::from_utf8_lossy(&raw[..NAME_LEN])
                    .trim_end_matches('\0')
                    .trim_end()
                    .to_string();
                let score = u32::from_le_bytes([
                    raw[NAME_LEN],
                    raw[NAME_LEN + 1],
                    raw[NAME_LEN + 2],
                    raw[NAME_LEN + 3],
                ]);
                self.scores[game][slot] = ScoreEntry { name, score };
            }
        }
        true
    }

    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(FILE_SIZE);
        buf.extend_from_slice(MAGIC);
        for game in &self.scores {
            for entry in game {
                // 9-byte name, zero padded
                let name_bytes = entry.name.as_bytes();
                let len = name_bytes.len().min(NAME_LEN);
                buf.extend_from_slice(&name_bytes[..len]);
                buf.resize(buf.len() + NAME_LEN - len, 0);
                buf.extend_from_slice(&entry.score.to_le_bytes());
            }
        }
        buf
    }

    fn save(&self) {
        if let Err(e) = fs::write(&self.path, self.encode()) {
            log::warn!("could not write {}: {e}", self.path.display());
        }
    }

    /// Would `score` make the top 3 (without inserting it)
    pub fn qualifies(&self, game_idx: usize, score: u32) -> bool {
        if game_idx >= NUM_GAMES || score == 0 {
            return false;
        }
        self.scores[game_idx].iter().any(|e| score > e.score)
    }

    /// Insert a score and persist the table. Returns true if it made the top 3.
    pub fn submit(&mut self, game_idx: usize, name: &str, score: u32) -> bool {
        if game_idx >= NUM_GAMES || score == 0 {
            return false;
        }

        // Truncate name to 9 chars
        let name: String = name.chars().take(NAME_LEN).collect();

        let table = &mut self.scores[game_idx];
        let Some(pos) = table.iter().position(|e| score > e.score) else {
            return false;
        };
        table.insert(pos, ScoreEntry { name, score });
        table.truncate(SCORES_PER_GAME);
        log::info!("new {} high score {score} at rank {}", GAME_NAMES[game_idx], pos + 1);
        self.save();
        true
    }

    pub fn top_scores(&self, game_idx: usize) -> Vec<ScoreEntry> {
        if game_idx >= NUM_GAMES {
            return vec![ScoreEntry::empty(); SCORES_PER_GAME];
        }
        self.scores[game_idx].clone()
    }

    pub fn was_submitted(&self, game_idx: usize) -> bool {
        game_idx < NUM_GAMES && self.submitted[game_idx]
    }

    pub fn mark_submitted(&mut self, game_idx: usize) {
        if game_idx < NUM_GAMES {
            self.submitted[game_idx] = true;
        }
    }

    /// Called once the game has left its game-over screen.
    pub fn clear_submitted(&mut self, game_idx: usize) {
        if game_idx < NUM_GAMES {
            self.submitted[game_idx] = false;
        }
    }
}
