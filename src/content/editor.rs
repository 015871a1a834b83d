//! Authoring form state: the live, exclusively-owned group list plus per-group presentation.

use crate::content::{
    AuthoringError, AuthoringResult, GroupType, QuestionGroup, QuestionPatch, group::start_numbers,
};

#[derive(Debug, Clone, PartialEq)]
pub struct GroupEditor {
    group: QuestionGroup,
    expanded: bool,
}

impl GroupEditor {
    pub fn new(group: QuestionGroup) -> Self {
        Self {
            group,
            expanded: true,
        }
    }

    pub fn group(&self) -> &QuestionGroup {
        &self.group
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Flips expanded/collapsed. Never touches the group data.
    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
    }
}

/// Groups of one part, numbered continuously after `first_number`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthoringForm {
    editors: Vec<GroupEditor>,
    first_number: u32,
}

impl AuthoringForm {
    pub fn new(first_number: u32) -> Self {
        Self {
            editors: Vec::new(),
            first_number,
        }
    }

    pub fn from_groups(groups: Vec<QuestionGroup>, first_number: u32) -> Self {
        Self {
            editors: groups.into_iter().map(GroupEditor::new).collect(),
            first_number,
        }
    }

    pub fn editors(&self) -> &[GroupEditor] {
        &self.editors
    }

    pub fn editor_mut(&mut self, index: usize) -> AuthoringResult<&mut GroupEditor> {
        let len = self.editors.len();
        self.editors
            .get_mut(index)
            .ok_or(AuthoringError::group_index(index, len))
    }

    pub fn add_group(&mut self, kind: GroupType) -> usize {
        self.editors.push(GroupEditor::new(QuestionGroup::new(kind)));
        self.editors.len() - 1
    }

    pub fn remove_group(&mut self, index: usize) -> AuthoringResult<QuestionGroup> {
        if index >= self.editors.len() {
            return Err(AuthoringError::group_index(index, self.editors.len()));
        }
        Ok(self.editors.remove(index).group)
    }

    /// `startNumber` of the group at `index`.
    pub fn start_number(&self, index: usize) -> AuthoringResult<u32> {
        let groups = self.groups();
        start_numbers(&groups, self.first_number)
            .get(index)
            .copied()
            .ok_or(AuthoringError::group_index(index, groups.len()))
    }

    pub fn add_question(&mut self, index: usize) -> AuthoringResult<()> {
        let start = self.start_number(index)?;
        let editor = self.editor_mut(index)?;
        editor.group = editor.group.add_question(start);
        Ok(())
    }

    pub fn update_question(
        &mut self,
        index: usize,
        question: usize,
        patch: QuestionPatch,
    ) -> AuthoringResult<()> {
        let editor = self.editor_mut(index)?;
        editor.group = editor.group.update_question(question, patch)?;
        Ok(())
    }

    pub fn remove_question(&mut self, index: usize, question: usize) -> AuthoringResult<()> {
        let editor = self.editor_mut(index)?;
        editor.group = editor.group.remove_question(question)?;
        Ok(())
    }

    /// Applies `f` to the group at `index`, replacing it with the result.
    pub fn edit_group<F>(&mut self, index: usize, f: F) -> AuthoringResult<()>
    where
        F: FnOnce(&QuestionGroup) -> AuthoringResult<QuestionGroup>,
    {
        let editor = self.editor_mut(index)?;
        editor.group = f(&editor.group)?;
        Ok(())
    }

    /// Independent copy of the current groups, ready for the assembler.
    pub fn groups(&self) -> Vec<QuestionGroup> {
        self.editors.iter().map(|e| e.group.clone()).collect()
    }
}
