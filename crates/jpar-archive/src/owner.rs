use std::fs::Metadata;

use tar::Header;

/// Record the names of the user and group owning `metadata` in `header`.
///
/// Ids without a name on this system, and names too long for the header
/// field, are skipped; the numeric ids are always present.
#[cfg(unix)]
pub(crate) fn set_owner_names(header: &mut Header, metadata: &Metadata) {
    use std::os::unix::fs::MetadataExt;
    use tracing::debug;

    let uid = metadata.uid();
    if let Some(user) = uzers::get_user_by_uid(uid) {
        if let Some(name) = user.name().to_str() {
            if let Err(err) = header.set_username(name) {
                debug!(uid, %err, "user name not recorded");
            }
        }
    }

    let gid = metadata.gid();
    if let Some(group) = uzers::get_group_by_gid(gid) {
        if let Some(name) = group.name().to_str() {
            if let Err(err) = header.set_groupname(name) {
                debug!(gid, %err, "group name not recorded");
            }
        }
    }
}

#[cfg(not(unix))]
pub(crate) fn set_owner_names(_header: &mut Header, _metadata: &Metadata) {}

#[cfg(all(test, unix))]
mod tests {
    use std::os::unix::fs::MetadataExt;

    use super::*;

    #[test]
    fn names_match_system_lookup() {
        let path = std::env::temp_dir().join(format!("jpar-owner-{}", std::process::id()));
        std::fs::write(&path, b"x").unwrap();
        let metadata = std::fs::metadata(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        let mut header = Header::new_gnu();
        header.set_metadata(&metadata);
        set_owner_names(&mut header, &metadata);

        let user = uzers::get_user_by_uid(metadata.uid())
            .map(|user| user.name().to_string_lossy().into_owned())
            .unwrap_or_default();
        let group = uzers::get_group_by_gid(metadata.gid())
            .map(|group| group.name().to_string_lossy().into_owned())
            .unwrap_or_default();
        assert_eq!(header.username().unwrap(), Some(user.as_str()));
        assert_eq!(header.groupname().unwrap(), Some(group.as_str()));
        assert_eq!(header.uid().unwrap(), u64::from(metadata.uid()));
    }
}
