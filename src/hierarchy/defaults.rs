//! Bundled hierarchy template installed on first run

/// Profile every new profile is copied from
pub const DEFAULT_PROFILE_NAME: &str = "_default";

/// Profiles whose name starts with this are system profiles
pub const RESERVED_PREFIX: &str = "_";

pub const BUILTIN_TEMPLATE: &str = r#"[
    {
        "name": "CLIENT NAME",
        "role": "client",
        "children": [
            {
                "name": "PROJECT NAME",
                "role": "project",
                "children": [
                    {
                        "name": "Assets",
                        "children": [
                            {
                                "name": "ASSET NAME",
                                "role": "asset",
                                "children": [
                                    {
                                        "name": "maya",
                                        "children": [
                                            { "name": "data", "children": [] },
                                            { "name": "images", "children": [] },
                                            {
                                                "name": "scenes",
                                                "children": [
                                                    { "name": "anim", "children": [] },
                                                    { "name": "lookdev", "children": [] },
                                                    { "name": "model", "children": [] },
                                                    { "name": "rig", "children": [] }
                                                ]
                                            },
                                            { "name": "sourceimages", "children": [] }
                                        ]
                                    }
                                ]
                            }
                        ]
                    },
                    { "name": "Documents", "children": [] },
                    { "name": "References", "children": [] }
                ]
            }
        ]
    }
]"#;
