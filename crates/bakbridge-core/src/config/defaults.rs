pub(super) fn default_overwrite() -> bool {
    true
}
