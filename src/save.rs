//! Emoji Clicker セーブ/ロード機能。
//!
//! セーブは 1 スロットのみ。`STORAGE_KEY` の下に JSON テキストを 1 つ置く。
//! 保存時に `lastSaved` (epoch ms) と `version` を付与する。
//!
//! ## 失敗時の扱い
//!
//! ストレージ障害・壊れた JSON・`version` 欠落はすべて同じ扱い:
//! ログに出して `false` / `None` を返す。呼び出し側に panic や Err は返さない。
//! 内部の `try_*` 系は `SaveResult` を返すので、詳細が必要なホストはそちらを使う。
//!
//! ## バージョニング
//!
//! `SAVE_VERSION` は書き込み時に刻むだけで、読み込み時のマイグレーションは無い。

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::state::GameState;
use crate::storage::{Storage, StorageError};
use crate::time::{Clock, SystemClock};

/// localStorage のキー。
pub const STORAGE_KEY: &str = "emoji_clicker_save";

/// セーブデータに刻むフォーマットバージョン。
pub const SAVE_VERSION: &str = "1.0.0";

/// オートセーブの推奨間隔 (ミリ秒)。スケジューリングはゲームループ側の責務。
pub const AUTO_SAVE_INTERVAL_MS: u32 = 10_000;

const LAST_SAVED_FIELD: &str = "lastSaved";
const VERSION_FIELD: &str = "version";

/// インポート用: パディングの有無を問わない (atob 相当)。
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("save data is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("save data is not a JSON object")]
    NotAnObject,

    #[error("Invalid save data: missing version")]
    MissingVersion,
}

pub type SaveResult<T> = Result<T, SaveError>;

/// 保存されたままの JSON オブジェクト。フィールドは開いている。
pub type SaveBlob = Map<String, Value>;

/// 単一スロットのセーブ管理。ストレージと時計は外から注入する。
pub struct SaveManager<S, C = SystemClock> {
    storage: S,
    clock: C,
    key: String,
}

impl<S: Storage> SaveManager<S, SystemClock> {
    pub fn new(storage: S) -> Self {
        Self::with_clock(storage, SystemClock)
    }
}

impl<S: Storage, C: Clock> SaveManager<S, C> {
    pub fn with_clock(storage: S, clock: C) -> Self {
        Self {
            storage,
            clock,
            key: STORAGE_KEY.to_string(),
        }
    }

    /// 同一オリジンで複数のゲームを動かす場合に別キーを使う。
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// `state` に `lastSaved` と `version` を付けて書き込み、書いた内容を返す。
    pub fn try_save<T: Serialize + ?Sized>(&self, state: &T) -> SaveResult<SaveBlob> {
        let mut blob = match serde_json::to_value(state)? {
            Value::Object(map) => map,
            _ => return Err(SaveError::NotAnObject),
        };
        blob.insert(LAST_SAVED_FIELD.to_string(), Value::from(self.clock.now_ms()));
        blob.insert(VERSION_FIELD.to_string(), Value::from(SAVE_VERSION));

        let json = serde_json::to_string(&blob)?;
        self.storage.set(&self.key, &json)?;
        log::debug!("Emoji Clicker: saved {} bytes under '{}'", json.len(), self.key);
        Ok(blob)
    }

    /// ゲーム状態を保存する。失敗時は false (ログ出力のみ)。
    pub fn save_game<T: Serialize + ?Sized>(&self, state: &T) -> bool {
        match self.try_save(state) {
            Ok(_) => true,
            Err(e) => {
                log::warn!("Emoji Clicker: セーブに失敗: {e}");
                false
            }
        }
    }

    /// 保存済み JSON を読む。未保存 (空文字含む) なら Ok(None)。
    pub fn try_load(&self) -> SaveResult<Option<SaveBlob>> {
        let json = match self.storage.get(&self.key)? {
            Some(j) if !j.is_empty() => j,
            _ => return Ok(None),
        };
        // TODO: SAVE_VERSION を上げたらここで旧フォーマットを変換する
        match serde_json::from_str::<Value>(&json)? {
            Value::Object(map) => Ok(Some(map)),
            _ => Err(SaveError::NotAnObject),
        }
    }

    /// セーブデータを読み込む。無い場合・壊れている場合は None。
    pub fn load_game(&self) -> Option<SaveBlob> {
        match self.try_load() {
            Ok(blob) => blob,
            Err(e) => {
                log::warn!("Emoji Clicker: ロードに失敗: {e}");
                None
            }
        }
    }

    /// [`load_game`](Self::load_game) の型付き版。
    pub fn load_state(&self) -> Option<GameState> {
        let blob = self.load_game()?;
        match serde_json::from_value(Value::Object(blob)) {
            Ok(state) => Some(state),
            Err(e) => {
                log::warn!("Emoji Clicker: セーブデータの形式が不正: {e}");
                None
            }
        }
    }

    /// 保存済みテキストを base64 で返す。未保存なら None。
    pub fn export_save(&self) -> Option<String> {
        match self.storage.get(&self.key) {
            Ok(Some(json)) if !json.is_empty() => Some(STANDARD.encode(json)),
            Ok(_) => None,
            Err(e) => {
                log::warn!("Emoji Clicker: エクスポートに失敗: {e}");
                None
            }
        }
    }

    /// base64 文字列を検証してから保存済みデータを置き換える。
    /// 検証に失敗した場合、既存のセーブには触れない。
    pub fn try_import(&self, save_string: &str) -> SaveResult<()> {
        let compact: String = save_string
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        let bytes = LENIENT_STANDARD.decode(compact)?;
        let decoded = String::from_utf8(bytes)?;

        let parsed: Value = serde_json::from_str(&decoded)?;
        let version = match &parsed {
            Value::Object(map) => map.get(VERSION_FIELD),
            _ => return Err(SaveError::NotAnObject),
        };
        if !version.is_some_and(is_truthy) {
            return Err(SaveError::MissingVersion);
        }

        self.storage.set(&self.key, &decoded)?;
        Ok(())
    }

    pub fn import_save(&self, save_string: &str) -> bool {
        match self.try_import(save_string) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Emoji Clicker: インポートに失敗: {e}");
                false
            }
        }
    }

    /// セーブデータを削除する。
    pub fn delete_save(&self) -> bool {
        match self.storage.remove(&self.key) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Emoji Clicker: セーブの削除に失敗: {e}");
                false
            }
        }
    }

    pub fn has_save(&self) -> bool {
        matches!(self.storage.get(&self.key), Ok(Some(_)))
    }

    /// 最終セーブからの経過秒数 (切り捨て)。セーブが無ければ 0。
    pub fn time_since_last_save(&self) -> u64 {
        let last_saved = self
            .load_game()
            .and_then(|blob| blob.get(LAST_SAVED_FIELD).and_then(Value::as_f64))
            .filter(|ms| *ms != 0.0 && ms.is_finite());

        match last_saved {
            // 時計が巻き戻った場合は 0 扱い
            Some(ms) => ((self.clock.now_ms() - ms) / 1000.0).floor().max(0.0) as u64,
            None => 0,
        }
    }
}

/// JSON 値の真偽判定 (null / false / 0 / "" は偽)。
fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
