use crate::models::Question;

/// Number of questions in one category or subcategory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCount {
    pub name: String,
    /// Category a subcategory belongs to; `None` for top-level categories.
    pub parent: Option<String>,
    pub count: usize,
}

/// Read-only question store with the group counts built once at load time.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
    categories: Vec<GroupCount>,
    subcategories: Vec<GroupCount>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Self {
        let mut categories: Vec<GroupCount> = Vec::new();
        let mut subcategories: Vec<GroupCount> = Vec::new();

        for question in &questions {
            bump(&mut categories, &question.category, None);
            if let Some(sub) = &question.subcategory {
                bump(&mut subcategories, sub, Some(&question.category));
            }
        }

        Self {
            questions,
            categories,
            subcategories,
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, absolute: usize) -> Option<&Question> {
        self.questions.get(absolute)
    }

    /// Top-level categories in order of first appearance.
    pub fn categories(&self) -> &[GroupCount] {
        &self.categories
    }

    pub fn subcategories(&self) -> &[GroupCount] {
        &self.subcategories
    }

    /// Category the subcategory was first seen under.
    pub fn parent_category(&self, subcategory: &str) -> Option<&str> {
        find(&self.subcategories, subcategory).and_then(|g| g.parent.as_deref())
    }
}

fn find<'a>(groups: &'a [GroupCount], name: &str) -> Option<&'a GroupCount> {
    groups.iter().find(|g| g.name == name)
}

fn bump(groups: &mut Vec<GroupCount>, name: &str, parent: Option<&str>) {
    match groups.iter_mut().find(|g| g.name == name) {
        Some(group) => group.count += 1,
        None => groups.push(GroupCount {
            name: name.to_string(),
            parent: parent.map(str::to_string),
            count: 1,
        }),
    }
}
