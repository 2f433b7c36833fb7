// Ordered teams with one current team; never empty
use super::roster::{Team, TeamLimits};
use crate::config::EngineConfig;
use crate::error::{Result, TeamError};

/// Trims and caps a team name at `max_len` characters; blank names are rejected.
pub fn normalize_team_name(name: &str, max_len: usize) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TeamError::InvalidTeamName);
    }
    Ok(trimmed.chars().take(max_len).collect::<String>().trim_end().to_string())
}

#[derive(Debug, Clone)]
pub struct TeamCollection {
    teams: Vec<Team>,
    current: usize,
    limits: TeamLimits,
    name_max_len: usize,
    name_prefix: String,
}

impl TeamCollection {
    /// One empty team
    pub fn new(config: &EngineConfig) -> Self {
        Self::from_teams(Vec::new(), 0, config)
    }

    /// Restores a collection; an empty list gets a fresh team and an
    /// out-of-range index falls back to the first team.
    pub fn from_teams(teams: Vec<Team>, current: usize, config: &EngineConfig) -> Self {
        let mut collection = Self {
            teams,
            current: 0,
            limits: config.team_limits(),
            name_max_len: config.team_name_max_len,
            name_prefix: config.default_team_name.clone(),
        };
        if collection.teams.is_empty() {
            let name = collection.default_name();
            collection.teams.push(Team::new(name, collection.limits));
        }
        collection.current = if current < collection.teams.len() { current } else { 0 };
        collection
    }

    fn default_name(&self) -> String {
        format!("{} {}", self.name_prefix, self.teams.len() + 1)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.teams.len() {
            return Err(TeamError::InvalidTeamIndex(index));
        }
        Ok(())
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Team> {
        self.teams.get(index)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &Team {
        &self.teams[self.current]
    }

    pub fn current_mut(&mut self) -> &mut Team {
        &mut self.teams[self.current]
    }

    pub fn limits(&self) -> TeamLimits {
        self.limits
    }

    /// Appends an empty team and makes it current; `None` picks a default name.
    pub fn add_team(&mut self, name: Option<&str>) -> Result<usize> {
        let name = match name {
            Some(name) => normalize_team_name(name, self.name_max_len)?,
            None => self.default_name(),
        };
        Ok(self.push_team(Team::new(name, self.limits)))
    }

    /// Appends a team and makes it current; returns its index.
    pub fn push_team(&mut self, team: Team) -> usize {
        self.teams.push(team);
        self.current = self.teams.len() - 1;
        log::info!("Team '{}' added at index {}", self.teams[self.current].name, self.current);
        self.current
    }

    /// Copies a team's composition into a new current team (fresh undo).
    pub fn duplicate_team(&mut self, index: usize) -> Result<usize> {
        self.check_index(index)?;
        let source = &self.teams[index];
        let name = normalize_team_name(&format!("{} (copy)", source.name), self.name_max_len)?;
        let copy = source.duplicate(name);
        Ok(self.push_team(copy))
    }

    pub fn rename_team(&mut self, index: usize, name: &str) -> Result<()> {
        self.check_index(index)?;
        let name = normalize_team_name(name, self.name_max_len)?;
        self.teams[index].name = name;
        Ok(())
    }

    /// Removes a team. The current index follows the team it pointed at, or
    /// the nearest remaining team when the current one is deleted.
    pub fn delete_team(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        if self.teams.len() == 1 {
            return Err(TeamError::LastTeamDeletion);
        }
        let removed = self.teams.remove(index);
        if self.current > index || self.current >= self.teams.len() {
            self.current -= 1;
        }
        log::info!("Team '{}' deleted", removed.name);
        Ok(())
    }

    pub fn switch_team(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.current = index;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team::roster::fixtures::catalog;

    fn collection() -> TeamCollection {
        TeamCollection::new(&EngineConfig::default())
    }

    #[test]
    fn test_starts_with_one_team() {
        let teams = collection();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams.current().name, "Team 1");
        assert_eq!(teams.current_index(), 0);
    }

    #[test]
    fn test_add_switch_rename() {
        let mut teams = collection();
        assert_eq!(teams.add_team(None).unwrap(), 1);
        assert_eq!(teams.current().name, "Team 2");
        assert_eq!(teams.add_team(Some("  Night Owls  ")).unwrap(), 2);
        assert_eq!(teams.current().name, "Night Owls");

        teams.switch_team(0).unwrap();
        assert_eq!(teams.current_index(), 0);
        assert_eq!(teams.switch_team(5).unwrap_err(), TeamError::InvalidTeamIndex(5));

        teams.rename_team(1, &"x".repeat(60)).unwrap();
        assert_eq!(teams.get(1).unwrap().name.chars().count(), 40);
        assert_eq!(teams.rename_team(1, "   ").unwrap_err(), TeamError::InvalidTeamName);
    }

    #[test]
    fn test_delete_keeps_at_least_one() {
        let mut teams = collection();
        assert_eq!(teams.delete_team(0).unwrap_err(), TeamError::LastTeamDeletion);

        teams.add_team(Some("B")).unwrap();
        teams.add_team(Some("C")).unwrap();
        teams.switch_team(2).unwrap();
        teams.delete_team(0).unwrap();
        assert_eq!(teams.current().name, "C");
        assert_eq!(teams.current_index(), 1);

        teams.delete_team(1).unwrap();
        assert_eq!(teams.current().name, "B");
        assert_eq!(teams.len(), 1);
    }

    #[test]
    fn test_duplicate_copies_composition() {
        let cat = catalog();
        let mut teams = collection();
        teams.current_mut().place_in_slot(&cat, "kageyama__ssr", 5).unwrap();

        let idx = teams.duplicate_team(0).unwrap();
        assert_eq!(teams.current_index(), idx);
        assert_eq!(teams.current().name, "Team 1 (copy)");
        assert_eq!(teams.current().slots()[5].as_deref(), Some("kageyama__ssr"));
        assert_eq!(teams.current().undo_depth(), 0);
        assert_ne!(teams.current().id, teams.get(0).unwrap().id);
    }

    #[test]
    fn test_from_teams_repairs_index() {
        let config = EngineConfig::default();
        let teams = TeamCollection::from_teams(vec![Team::new("Only", config.team_limits())], 7, &config);
        assert_eq!(teams.current_index(), 0);
        assert_eq!(TeamCollection::from_teams(Vec::new(), 3, &config).len(), 1);
    }
}
