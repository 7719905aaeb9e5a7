use crate::error::{Result, TrackerError};
use std::io::{Cursor, Read};

/// Reads one member out of a downloaded zip container.
pub fn extract_member(zip_bytes: &[u8], member: &str) -> Result<Vec<u8>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(zip_bytes))
        .map_err(|e| TrackerError::Archive(format!("not a zip container: {}", e)))?;
    let mut file = archive
        .by_name(member)
        .map_err(|e| TrackerError::Archive(format!("member '{}' unavailable: {}", member, e)))?;
    // Declared sizes come from the archive itself and are not trusted
    let mut out = Vec::new();
    file.read_to_end(&mut out)
        .map_err(|e| TrackerError::Archive(format!("failed to read '{}': {}", member, e)))?;
    Ok(out)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::FileOptions;
    use zip::CompressionMethod;

    pub(crate) fn build_zip(members: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Stored);
        for (name, body) in members {
            writer.start_file(*name, options).unwrap();
            writer.write_all(body).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn extracts_named_member() {
        let zip = build_zip(&[("Other.html", &b"x"[..]), ("Artists.html", &b"<table></table>"[..])]);
        assert_eq!(extract_member(&zip, "Artists.html").unwrap(), b"<table></table>");
    }

    #[test]
    fn missing_member_is_archive_failure() {
        let zip = build_zip(&[("Other.html", &b"x"[..])]);
        assert!(matches!(extract_member(&zip, "Artists.html"), Err(TrackerError::Archive(_))));
    }

    #[test]
    fn declared_size_does_not_drive_allocation() {
        let mut zip = build_zip(&[("Artists.html", &b"<table></table>"[..])]);
        // Claim a ~4 GiB uncompressed size in the central directory entry
        let central = zip.windows(4).position(|w| w == b"PK\x01\x02").unwrap();
        zip[central + 24..central + 28].copy_from_slice(&0xFFFF_FF00u32.to_le_bytes());

        let out = extract_member(&zip, "Artists.html").unwrap();
        assert_eq!(out, b"<table></table>");
        assert!(out.capacity() < 1 << 20);
    }

    #[test]
    fn garbage_is_archive_failure() {
        assert!(matches!(extract_member(b"not a zip", "Artists.html"), Err(TrackerError::Archive(_))));
    }
}
