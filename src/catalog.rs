use crate::models::{Catalog, Subject, Topic};

/// The GATE syllabus the tracker ships with.
///
/// Names are display text only. One `coa` entry carries a mangled name and
/// shares its id with the following entry; both are kept as-is, so marking
/// `coa-2` done counts for two rows.
pub fn gate_catalog() -> Catalog {
    Catalog::new(vec![
        subject(
            "coa",
            "Computer Organization & Architecture",
            &[
                ("coa-1", "Lecture 1: COA - Lecture 1"),
                ("coa-2", r#"Lecture 2: COA - Lecture 2 A/B"  name: "Lecture 1: COA - Lecture 1"#),
                ("coa-2", "Lecture 2: COA - Lecture 2 A/B"),
                ("coa-3", "Lecture 3: COA - Lecture 3 A/B"),
                ("coa-4", "Lecture 4: COA - Lecture 4 A/B"),
                ("coa-5", "Lecture 5: COA - Lecture 5"),
                ("coa-6", "Lecture 6: COA - Lecture 6 A/B"),
                ("coa-7", "Lecture 7: COA - Lecture 7"),
                ("coa-8", "Lecture 8: COA - Lecture 8"),
                ("coa-9", "Lecture 9: COA - Lecture 9"),
            ],
        ),
        subject(
            "dbms",
            "Database Management Systems",
            &[
                ("dbms-1", "Lecture 1-2: Integrity Constraints"),
                ("dbms-2", "Lecture 3-4: Super key and Foreign key"),
                ("dbms-3", "Lecture 5-7: Normalization"),
                ("dbms-4", "Lecture 8-10: Lossless Join and DP"),
                ("dbms-5", "Lecture 11-12: Normal Forms"),
                ("dbms-6", "Lecture 13-16: Queries - Relational Algebra"),
                ("dbms-7", "Lecture 17-20: Queries - SQL"),
                ("dbms-8", "Lecture 21-24: ER Model"),
                ("dbms-9", "Lecture 25-28: Indexing"),
                ("dbms-10", "Lecture 29-32: Transactions and Concurrency Control"),
            ],
        ),
        subject(
            "os",
            "Operating Systems",
            &[
                ("os-1", "Lecture 1-4: OS Introduction"),
                ("os-2", "Lecture 5-7: OS Processes"),
                ("os-3", "Lecture 8-11: OS Memory Management"),
                ("os-4", "Lecture 12-14: OS File Systems"),
                ("os-5", "Lecture 15-17: OS Deadlocks"),
                ("os-6", "Lecture 18-19: OS Advanced Topics"),
            ],
        ),
        subject(
            "toc",
            "Theory of Computation",
            &[
                ("toc-1", "Lecture 1-3: TOC Basics"),
                ("toc-2", "Lecture 4-6: Finite Automata"),
                ("toc-3", "Lecture 7-9: Regular Languages"),
                ("toc-4", "Lecture 10-12: Context-Free Grammars"),
                ("toc-5", "Lecture 13-15: Pushdown Automata"),
                ("toc-6", "Lecture 16-18: Turing Machines"),
                ("toc-7", "Lecture 19-21: Decidability"),
                ("toc-8", "Lecture 22-24: Complexity Theory"),
            ],
        ),
        subject(
            "cd",
            "Compiler Design",
            &[
                ("cd-1", "Lecture 1-3: Lexical Analysis"),
                ("cd-2", "Lecture 4-6: Syntax Analysis"),
                ("cd-3", "Lecture 7-9: Semantic Analysis"),
                ("cd-4", "Lecture 10-12: Intermediate Code Generation"),
                ("cd-5", "Lecture 13-14: Code Optimization"),
            ],
        ),
        subject(
            "dl",
            "Digital Logic",
            &[
                ("dl-1", "Lecture 1-3: Boolean Algebra"),
                ("dl-2", "Lecture 4-6: Combinational Circuits"),
                ("dl-3", "Lecture 7-9: Sequential Circuits"),
                ("dl-4", "Lecture 10-12: Minimization Techniques"),
                ("dl-5", "Lecture 13-15: Memory & Programmable Logic"),
                ("dl-6", "Lecture 16-18: Advanced Topics"),
            ],
        ),
        subject(
            "pds",
            "Programming & Data Structures",
            &[
                ("pds-1", "Lecture 1-4: Programming Fundamentals"),
                ("pds-2", "Lecture 5-8: Arrays & Strings"),
                ("pds-3", "Lecture 9-12: Linked Lists, Stacks & Queues"),
                ("pds-4", "Lecture 13-16: Trees & Heaps"),
                ("pds-5", "Lecture 17-19: Graphs"),
                ("pds-6", "Lecture 20-22: Hashing & Advanced Topics"),
            ],
        ),
        subject(
            "ra",
            "Reasoning & Aptitude",
            &[
                ("ra-1", "Lecture 1-4: Verbal Reasoning"),
                ("ra-2", "Lecture 5-8: Analytical Reasoning"),
                ("ra-3", "Lecture 9-12: Numerical Reasoning"),
                ("ra-4", "Lecture 13-16: Data Interpretation"),
            ],
        ),
        subject(
            "em",
            "Engineering Mathematics",
            &[
                ("em-1", "Lecture 1-5: Linear Algebra"),
                ("em-2", "Lecture 6-10: Calculus"),
                ("em-3", "Lecture 11-15: Probability & Statistics"),
                ("em-4", "Lecture 16-20: Differential Equations"),
                ("em-5", "Lecture 21-25: Complex Variables & Numerical Methods"),
            ],
        ),
        subject(
            "cn",
            "Computer Networks",
            &[
                ("cn-1", "Lecture 1-5: Network Fundamentals & Addressing"),
                ("cn-2", "Lecture 6-10: Data Link Layer & Flow Control"),
                ("cn-3", "Lecture 11-14: MAC Protocols & LAN"),
                ("cn-4", "Lecture 15-17: Network Layer & Routing"),
                ("cn-5", "Lecture 18-19: Application Layer Protocols"),
            ],
        ),
        subject(
            "dm",
            "Discrete Mathematics",
            &[
                ("dm-1", "Lecture 1-4: Set Theory"),
                ("dm-2", "Lecture 5-8: Graph Theory"),
                ("dm-3", "Lecture 9-10: Combinatorics"),
                ("dm-4", "Lecture 11-13: Mathematical Logic"),
            ],
        ),
        subject(
            "algo",
            "Algorithms",
            &[
                ("algo-1", "Lecture 1-5: Asymptotic Notations & Complexity"),
                ("algo-2", "Lecture 6-10: Recurrence Relations"),
                ("algo-3", "Lecture 11-15: Sorting & Searching"),
                ("algo-4", "Lecture 16-18: Greedy Algorithms"),
                ("algo-5", "Lecture 19-21: Dynamic Programming"),
                ("algo-6", "Lecture 22-24: Graph Algorithms"),
            ],
        ),
    ])
}

/// Accent colour used when rendering a subject.
pub fn subject_color(subject_id: &str) -> &'static str {
    match subject_id {
        "coa" => "#4C51BF",
        "dbms" => "#2B6CB0",
        "os" => "#2C7A7B",
        "toc" => "#2F855A",
        "cd" => "#9C4221",
        "dl" => "#744210",
        "pds" => "#702459",
        "ra" => "#5A67D8",
        "em" => "#E53E3E",
        "cn" => "#6B46C1",
        "dm" => "#DD6B20",
        "algo" => "#805AD5",
        _ => "#3182CE",
    }
}

fn subject(id: &str, name: &str, items: &[(&str, &str)]) -> Subject {
    Subject {
        id: id.to_owned(),
        name: name.to_owned(),
        items: items
            .iter()
            .map(|(topic_id, topic_name)| Topic::new(*topic_id, *topic_name))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_every_subject_in_order() {
        let catalog = gate_catalog();
        let ids: Vec<&str> = catalog.iter().map(|subject| subject.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["coa", "dbms", "os", "toc", "cd", "dl", "pds", "ra", "em", "cn", "dm", "algo"]
        );
        assert_eq!(catalog.total_topics(), 75);
    }

    #[test]
    fn subject_ids_never_contain_the_key_separator() {
        for subject in gate_catalog().iter() {
            assert!(!subject.id.contains('-'), "{}", subject.id);
        }
    }

    #[test]
    fn unknown_subjects_get_the_default_color() {
        assert_eq!(subject_color("os"), "#2C7A7B");
        assert_eq!(subject_color("physics"), "#3182CE");
    }

    #[test]
    fn mangled_entry_is_kept_verbatim() {
        let catalog = gate_catalog();
        let coa = catalog.get("coa").unwrap();
        assert_eq!(coa.items.len(), 10);
        assert_eq!(coa.items[1].id, "coa-2");
        assert_eq!(coa.items[2].id, "coa-2");
        assert!(coa.items[1].name.contains("name: \"Lecture 1"));
    }
}
