// リクエストボディの解析
//
// 各ハンドラーで共通のJSONボディ読み取り処理。

use serde_json::{Map, Value};

use crate::application::ApiError;

/// ボディをJSONオブジェクトとして解析
///
/// 空のボディは`Missing body`、JSONでない・オブジェクトでない場合は
/// `Invalid JSON body`として400を返す。
pub fn parse_json_object(body: &[u8]) -> Result<Map<String, Value>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::bad_request("Missing body"));
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ApiError::bad_request("Invalid JSON body: expected an object")),
        Err(err) => Err(ApiError::bad_request(format!("Invalid JSON body: {err}"))),
    }
}

/// 空でない文字列フィールドを取得
///
/// 複数のキー名を順に探す（例: `albumName`と`album_name`）。
pub fn non_empty_str<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .filter_map(Value::as_str)
        .find(|value| !value.is_empty())
}
