use mir_meta::{DatasetDescriptor, derive_module_key};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_module_key_is_deterministic(directory in "[A-Za-z][A-Za-z0-9]{0,8}(-[A-Za-z0-9]{1,8}){0,3}") {
        let first = derive_module_key(&directory);
        let second = derive_module_key(&directory);
        prop_assert_eq!(&first, &second);
        prop_assert!(!first.contains("__"));
        prop_assert!(!first.chars().any(|c| c.is_uppercase()));
        prop_assert!(!first.contains('-'));

        let descriptor = DatasetDescriptor::new("Generated Dataset", directory.as_str()).unwrap();
        prop_assert_eq!(descriptor.module_key(), first.as_str());
    }

    #[test]
    fn test_adjacent_separators_always_rejected(left in "[A-Za-z]{1,6}", right in "[A-Za-z]{1,6}", sep in "(--|-_|_-|__)") {
        let directory = format!("{left}{sep}{right}");
        prop_assert!(DatasetDescriptor::new("Generated Dataset", directory.as_str()).is_err());
    }
}
