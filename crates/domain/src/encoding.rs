//! # 添付ファイルのエンコーディング
//!
//! 添付ファイルはクライアントからもバケット走査からも base64 文字列で受け渡される。
//!
//! クライアントによってはパディング（`=`）を落として送ってくるため、
//! デコード前に長さを 4 の倍数までパディングで補う。正しくパディングされた
//! 文字列はそのまま残る（補修は冪等）。

use std::borrow::Cow;

use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::notification::NotificationError;

/// base64 文字列のパディングを補修する
///
/// 長さが 4 の倍数でなければ、次の 4 の倍数まで `=` を追加する。
pub fn repair_padding(encoded: &str) -> Cow<'_, str> {
    match encoded.len() % 4 {
        0 => Cow::Borrowed(encoded),
        remainder => {
            let mut repaired = String::with_capacity(encoded.len() + 4 - remainder);
            repaired.push_str(encoded);
            repaired.push_str(&"=".repeat(4 - remainder));
            Cow::Owned(repaired)
        }
    }
}

/// 添付ファイルの base64 文字列をデコードする
///
/// 空文字列は「添付内容なし」として即座にエラーにする。
pub fn decode_attachment(encoded: &str) -> Result<Vec<u8>, NotificationError> {
    if encoded.is_empty() {
        return Err(NotificationError::InvalidAttachment(
            "添付ファイルの内容がありません".to_string(),
        ));
    }

    STANDARD
        .decode(repair_padding(encoded).as_bytes())
        .map_err(|e| NotificationError::InvalidAttachment(format!("base64 デコード失敗: {e}")))
}

/// バイト列を転送用の base64 文字列にエンコードする
pub fn encode_attachment(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("", "")]
    #[case("YWJj", "YWJj")]
    #[case("YWI=", "YWI=")]
    #[case("YQ==", "YQ==")]
    fn test_正しくパディングされた文字列は変更されない(#[case] input: &str, #[case] expected: &str) {
        let repaired = repair_padding(input);

        assert!(matches!(repaired, Cow::Borrowed(_)));
        assert_eq!(repaired, expected);
    }

    #[rstest]
    #[case("YWI", "YWI=")]
    #[case("YQ", "YQ==")]
    #[case("YWJjZ", "YWJjZ===")]
    fn test_不足したパディングが補われる(#[case] input: &str, #[case] expected: &str) {
        let repaired = repair_padding(input);

        assert_eq!(repaired, expected);
        assert_eq!(repaired.len() % 4, 0);
    }

    #[test]
    fn test_補修は冪等である() {
        let once = repair_padding("YQ").into_owned();
        let twice = repair_padding(&once).into_owned();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_パディングが欠けていてもデコードできる() {
        assert_eq!(decode_attachment("YQ").unwrap(), b"a");
        assert_eq!(decode_attachment("YWI").unwrap(), b"ab");
    }

    #[test]
    fn test_エンコードしてデコードすると元のバイト列に戻る() {
        let original: Vec<u8> = (0u8..=255).collect();

        let decoded = decode_attachment(&encode_attachment(&original)).unwrap();

        assert_eq!(decoded, original);
    }

    #[test]
    fn test_空文字列はエラーになる() {
        let err = decode_attachment("").unwrap_err();

        assert!(matches!(err, NotificationError::InvalidAttachment(_)));
    }

    #[test]
    fn test_base64でない文字列はエラーになる() {
        let err = decode_attachment("!!!not-base64!!!").unwrap_err();

        assert!(matches!(err, NotificationError::InvalidAttachment(_)));
        assert!(err.to_string().contains("base64"));
    }
}
