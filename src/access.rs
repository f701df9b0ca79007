// Os motores puros de autorização e visibilidade. Nenhum I/O aqui:
// os serviços chamam estas funções e levam o resultado ao armazenamento.
pub mod grants;
pub mod hierarchy;
pub mod rules;
pub mod visibility;
